//! Error types for riddle-core.

use thiserror::Error;

/// Result type for riddle-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for riddle-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Caller broke a data-model usage contract.
    #[error("Contract violation: {0}")]
    Contract(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a contract violation error.
    #[must_use]
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }
}
