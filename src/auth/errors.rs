//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;
use crate::otp::OtpError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Verification code flow error surfaced through registration or reset
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// JWT token error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Email/password pair does not match any verified account
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but has not completed email verification
    #[error("Email not verified")]
    NotVerified,

    /// Email already exists
    #[error("Email already exists")]
    DuplicateEmail,

    /// A required registration field is empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid email format
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password too weak
    #[error("Password too weak: {0}")]
    WeakPassword(String),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage and JWT errors are sanitized to prevent information disclosure
    /// about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            // Sanitize storage errors - don't expose SQL details
            AuthError::Store(_) => "Internal server error".to_string(),
            // Sanitize JWT errors - don't expose token structure
            AuthError::Jwt(_) => "Authentication failed".to_string(),
            AuthError::Otp(err) => err.client_message(),
            // All other errors are safe to expose
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
