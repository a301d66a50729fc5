//! # CoolCRM
//!
//! Core library for a cooling-services CRM: accounts with email
//! verification, role-gated administration, and per-field customer record
//! access.
//!
//! Registration creates an unverified account and emails it a six-digit
//! one-time code; only verified accounts can log in and receive a JWT access
//! token. The same code machinery drives password resets. Customer records
//! sit behind per-field grants: admin roles see everything, `user` accounts
//! see exactly the fields a superadmin granted them.
//!
//! ## Core Modules
//!
//! - [`auth`]: Registration, login, password reset, access tokens
//! - [`otp`]: One-time code issuing, delivery, and checking
//! - [`account`]: Account model, roles, administrative operations
//! - [`customer`]: Customer records, lookup tables, about-page content
//! - [`email`]: Outbound mail through Brevo, with logging and in-memory stand-ins
//! - [`db`]: PostgreSQL pool, repository traits, in-memory backends
//! - [`config`]: Environment-driven configuration
//!
//! ## Example
//!
//! ```no_run
//! use coolcrm::auth::AuthManager;
//! use coolcrm::config::AppConfig;
//! use coolcrm::db::{Database, PgAccountRepository};
//! use coolcrm::otp::OtpManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let db = Database::new(&config.database).await?;
//!     db.init_schema().await?;
//!
//!     let accounts = Arc::new(PgAccountRepository::new(db.pool().clone()));
//!     let mailer = coolcrm::email::from_config(&config.email)?;
//!     let otp = OtpManager::new(accounts.clone(), mailer, &config.otp);
//!     let auth = AuthManager::new(accounts, otp, &config.security);
//!
//!     let claims = auth.verify_access_token("...")?;
//!     println!("Request from account {}", claims.sub);
//!     Ok(())
//! }
//! ```

/// Account model, roles, and administrative operations.
pub mod account;
pub use account::{Account, AccountId, AccountManager, FieldPermissions, Role};

/// Registration, login, password reset, and access tokens.
pub mod auth;
pub use auth::{AccessTokenClaims, AuthManager};

/// Environment-driven configuration.
pub mod config;
pub use config::AppConfig;

/// Customer records, lookup tables, and about-page content.
pub mod customer;
pub use customer::{Customer, CustomerManager, CustomerView};

/// PostgreSQL pool, repository traits, and in-memory backends.
pub mod db;
pub use db::Database;

/// Outbound email delivery.
pub mod email;
pub use email::Mailer;

/// One-time verification codes.
pub mod otp;
pub use otp::OtpManager;
