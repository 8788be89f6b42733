//! Logging setup for scoutctl
//!
//! Logs go to stderr so the conversation on stdout stays readable.
//! `SCOUT_LOG` (or `RUST_LOG`) overrides the configured level.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SCOUT_LOG";

/// Build the filter: `SCOUT_LOG`, then `RUST_LOG`, then `level`
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber; a second call is a no-op
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
