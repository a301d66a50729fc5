//! Verification code error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::email::EmailError;

/// Verification code errors
#[derive(Debug, Error)]
pub enum OtpError {
    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// The code was persisted but the email carrying it was not delivered
    #[error("Verification email failed: {0}")]
    Email(#[from] EmailError),

    /// No account matches the given identifier
    #[error("Account not found")]
    NotFound,

    /// The account has already completed email verification
    #[error("Account is already verified")]
    AlreadyVerified,

    /// The submitted code does not match the pending one, or none is pending
    #[error("Invalid verification code")]
    InvalidCode,

    /// The pending code matched but its expiry has passed
    #[error("Verification code has expired")]
    Expired,
}

impl OtpError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage and delivery errors are sanitized to prevent information
    /// disclosure about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            OtpError::Store(_) => "Internal server error".to_string(),
            OtpError::Email(_) => "Failed to send verification email".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for verification code operations
pub type OtpResult<T> = Result<T, OtpError>;
