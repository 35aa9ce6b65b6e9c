//! Configuration for the editor

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Consecutive Ctrl-Q presses needed to quit with unsaved changes
    pub quit_times: u32,
    /// How long a single stdin read waits before giving up, in milliseconds
    pub read_timeout_ms: u64,
    /// How long a status message stays on screen, in seconds
    pub message_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quit_times: 3,
            read_timeout_ms: 100,
            message_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Lifetime of a status message
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }
}
