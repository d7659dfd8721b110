//! Error types for persistence

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised while reading or writing a network or spike-trace file
#[derive(Error, Debug)]
pub enum StorageError {
    /// The file's magic number or version did not match what this crate
    /// produces
    #[error("format error: {0}")]
    FormatError(String),

    /// Underlying filesystem operation failed
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON encoding failure: {0}")]
    JsonFailure(#[from] serde_json::Error),

    /// Binary (de)serialization failed
    #[error("binary encoding failure: {0}")]
    BincodeFailure(#[from] bincode::Error),
}

impl StorageError {
    /// Build a [`StorageError::FormatError`]
    pub fn format_error(reason: impl Into<String>) -> Self {
        Self::FormatError(reason.into())
    }
}
