//! Application glue module
//!
//! Configuration and logging setup.

mod config;
mod logging;

pub use config::Config;
pub use logging::{init_logging, LOG_ENV};
