use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{Result, SyncError};

/// Install the global tracing subscriber.
///
/// Logs go to stderr so they never mix with the progress narration on
/// stdout. `RUST_LOG` decides the level, defaulting to `warn`; `verbose`
/// forces `debug`.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))
    }
    .map_err(|e| SyncError::Config(format!("Invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SyncError::Config(format!("Failed to initialize logging: {e}")))
}
