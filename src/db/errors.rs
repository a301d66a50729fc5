//! Storage error types.

use thiserror::Error;

/// Storage errors shared by all repositories
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Email uniqueness violation on account creation
    #[error("Email already exists")]
    DuplicateEmail,

    /// A stored row could not be decoded into its model
    #[error("Malformed stored record: {0}")]
    Malformed(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
