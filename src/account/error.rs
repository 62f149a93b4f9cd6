//! Account error types
//!
//! The two credential failures are shown inline on the sign-up and login
//! forms; everything else comes from the storage layer.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by account and session operations
#[derive(Error, Debug)]
pub enum AccountError {
    /// Registration with a username that is already taken
    #[error("username already exists")]
    UsernameTaken,

    /// No account matches both username and password
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Persisting state failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AccountError {
    /// Whether the form should show the message and let the user retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AccountError::UsernameTaken | AccountError::InvalidCredentials
        )
    }
}

/// Result type alias for account operations
pub type AccountResult<T> = Result<T, AccountError>;
