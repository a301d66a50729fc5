//! Account administration error types.

use thiserror::Error;

use crate::account::Role;
use crate::db::StoreError;

/// Account administration errors
#[derive(Debug, Error)]
pub enum AccountError {
    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// No account matches the given identifier
    #[error("Account not found")]
    NotFound,

    /// The acting account's role does not permit this operation
    #[error("Operation requires {required} role")]
    Forbidden { required: Role },
}

impl AccountError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            AccountError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for account administration operations
pub type AccountResult<T> = Result<T, AccountError>;
