//! Logging setup.
//!
//! Logs go to stderr by default so they interleave sanely with the prompt.
//! With a log file, everything from `info` up is written there instead.

use std::fs::File;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Log to stderr. Quiet unless `RUST_LOG` says otherwise.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Log to `path`, truncating it.
pub fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let log_file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}
