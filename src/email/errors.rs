//! Email delivery error types.

use thiserror::Error;

/// Email delivery errors
#[derive(Debug, Error)]
pub enum EmailError {
    /// The message never reached the provider
    #[error("Email transport error: {0}")]
    Transport(String),

    /// The provider refused the message
    #[error("Email rejected (status {status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The mailer is missing required configuration
    #[error("Mailer misconfigured: {0}")]
    Config(String),
}

/// Result type for email delivery operations
pub type EmailResult<T> = Result<T, EmailError>;
