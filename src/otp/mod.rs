//! Email verification code (OTP) module.
//!
//! This module implements the one-time code lifecycle used by registration
//! and password reset:
//! - Six-digit codes drawn from [100000, 999999], never zero-padded
//! - One pending challenge per account; issuing overwrites the previous one
//! - Persist-then-send: a failed email leaves the challenge usable
//! - Constant-time code comparison, match checked before expiry
//!
//! ## Example
//!
//! ```no_run
//! use coolcrm::config::OtpConfig;
//! use coolcrm::db::MemoryAccountRepository;
//! use coolcrm::email::LogMailer;
//! use coolcrm::otp::OtpManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let accounts = Arc::new(MemoryAccountRepository::new());
//!     let otp = OtpManager::new(accounts, Arc::new(LogMailer), &OtpConfig::default());
//!
//!     let expires_at = otp.issue(1).await?;
//!     println!("Code emailed, valid until {expires_at}");
//!     Ok(())
//! }
//! ```

pub mod code;
pub mod errors;
pub mod manager;

pub use code::{CODE_LENGTH, generate_code};
pub use errors::{OtpError, OtpResult};
pub use manager::OtpManager;
