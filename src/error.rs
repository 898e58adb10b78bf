//! Error types for the monitor.

use thiserror::Error;

/// Errors that end a monitor session abnormally.
///
/// Operator mistakes (unknown commands, missing arguments) are never errors;
/// handlers print a hint and the loop carries on.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Writing monitor output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The line editor could not read from the terminal.
    #[error("line editor error: {0}")]
    LineEditor(#[from] rustyline::error::ReadlineError),

    /// An emulator subsystem failed to initialize.
    #[error("failed to initialize {subsystem}: {source}")]
    Init {
        subsystem: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MonitorError {
    /// Wrap an emulator error raised during startup.
    pub fn init<E>(subsystem: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Init {
            subsystem,
            source: Box::new(source),
        }
    }
}

/// Result type alias using MonitorError.
pub type Result<T> = std::result::Result<T, MonitorError>;
