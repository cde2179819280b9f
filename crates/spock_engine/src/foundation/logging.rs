//! Logging setup
//!
//! The engine logs through the `log` facade only. The binary installs one
//! process-wide `env_logger` backend at startup; there is no teardown. Tests
//! and embedders may install any other `log` implementation instead.

pub use log::{debug, error, info, trace, warn};

/// Install the `env_logger` backend with `default_filter`
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a logger is
/// already installed.
pub fn init(default_filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
}
