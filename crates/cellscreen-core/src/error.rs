//! Error types shared by every display backend.

use thiserror::Error;

/// Errors surfaced by a display backend.
///
/// Out-of-range addressing and unknown key names are not errors; they are
/// clipped or degraded silently.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// IO error from terminal or platform operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend could not enter its rendering mode.
    #[error("Display startup failed: {0}")]
    Startup(String),

    /// An operation that needs a running backend was called before `start`.
    #[error("Display not started")]
    NotStarted,

    /// The platform stopped delivering events while a key was awaited.
    #[error("Event source closed")]
    EventSourceClosed,

    /// Configuration could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the cellscreen crates.
pub type Result<T> = std::result::Result<T, DisplayError>;
