//! Error types for terminal state operations

use thiserror::Error;

/// Terminal error type
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The style set has no free slots left
    #[error("style set capacity exhausted")]
    OutOfStyleCapacity,

    /// An allocator-backed operation failed (screen resize, large insert)
    #[error("allocation failed: {0}")]
    AllocFailure(&'static str),

    /// Reserved. The dispatcher never produces this; unknown SGR and
    /// unknown DCS/APC payloads are ignored instead.
    #[error("invalid action")]
    InvalidAction,
}

/// Result type for terminal operations
pub type Result<T> = std::result::Result<T, Error>;
