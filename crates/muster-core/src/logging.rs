//! Log initialization.
//!
//! Logs are written to a daily-rotated file under `${MUSTER_HOME}/logs`
//! rather than the terminal: the dashboard owns the terminal, and the CLI
//! commands reserve stdout for their actual output.
//!
//! The filter follows `MUSTER_LOG` (tracing env-filter syntax), then the
//! `log_filter` config key, then "info".

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "MUSTER_LOG";

/// Initializes file-based logging and returns the appender guard.
///
/// The guard must be held for the lifetime of the process; dropping it
/// stops the background writer and loses buffered lines.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let dir = paths::logs_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, "muster.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| "info".to_string());

    // try_init so a second call (e.g. from tests) is a no-op instead of a
    // panic.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
