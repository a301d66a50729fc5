//! Authentication module providing registration, login, and password reset.
//!
//! This module implements credential handling with:
//! - Argon2id password hashing with per-password salts
//! - Email verification gating login (see [`crate::otp`])
//! - JWT access tokens carrying the account ID and role (1-day expiry)
//! - Uniform `InvalidCredentials` for unknown emails and wrong passwords
//!
//! ## Example
//!
//! ```no_run
//! use coolcrm::auth::{AuthManager, RegisterRequest};
//! use coolcrm::config::{OtpConfig, SecurityConfig};
//! use coolcrm::db::MemoryAccountRepository;
//! use coolcrm::email::LogMailer;
//! use coolcrm::otp::OtpManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let accounts = Arc::new(MemoryAccountRepository::new());
//!     let otp = OtpManager::new(accounts.clone(), Arc::new(LogMailer), &OtpConfig::default());
//!     let auth = AuthManager::new(
//!         accounts,
//!         otp,
//!         &SecurityConfig {
//!             jwt_secret: "change-me-to-a-32-byte-minimum-secret".to_string(),
//!             token_ttl_secs: 86_400,
//!         },
//!     );
//!
//!     let receipt = auth
//!         .register(RegisterRequest {
//!             name: "Asha".to_string(),
//!             email: "asha@example.com".to_string(),
//!             mobile: "5550100".to_string(),
//!             password: "SecurePass123".to_string(),
//!         })
//!         .await?;
//!     println!("Verification code expires at {}", receipt.otp_expires_at);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod password;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    AccessTokenClaims, LoginRequest, LoginResponse, RegisterRequest, RegistrationReceipt,
};
pub use password::{validate_email, validate_password};
