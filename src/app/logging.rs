//! Logging setup
//!
//! The editor owns the terminal, so log lines cannot go to stdout or
//! stderr. They are written to the file named by [`LOG_ENV`] instead, and
//! logging stays off when it is unset.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the log file
pub const LOG_ENV: &str = "MOCHI_EDIT_LOG";

/// Install the global subscriber if a log file is configured
///
/// Returns whether logging was enabled. The filter comes from `RUST_LOG`
/// and defaults to `info`.
pub fn init_logging() -> io::Result<bool> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(false);
    };
    let file = open_log(Path::new(&path))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(true)
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
