//! State backend error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted state
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The underlying database rejected the operation
    #[error("Backend error: {0}")]
    Backend(String),

    /// Unknown backend kind in configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
