//! Error types for riddle.

use thiserror::Error;

/// Result type for riddle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for riddle operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Sink or database configuration is incomplete or unsupported.
    /// Reported before any write attempt is made.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller broke a usage contract (mixed block shapes, dataset index
    /// out of range, missing profile). Surfaced immediately rather than
    /// silently defaulted.
    #[error("Contract violation: {0}")]
    Contract(String),

    /// A sink rejected output. Already-computed metrics stay valid.
    #[error("Sink error: {0}")]
    Sink(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core data-model error.
    #[error(transparent)]
    Core(#[from] riddle_core::Error),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a contract violation error.
    #[must_use]
    pub fn contract(msg: impl Into<String>) -> Self {
        Error::Contract(msg.into())
    }

    /// Create a sink error.
    #[must_use]
    pub fn sink(msg: impl Into<String>) -> Self {
        Error::Sink(msg.into())
    }
}
