//! Account module providing the account model and its administration.
//!
//! Accounts carry an email-verified flag, a role (`user`, `admin`,
//! `superadmin`), at most one pending verification challenge, and per-field
//! customer record grants. Administration is role-gated: listing requires an
//! admin role, while role changes, permission grants, and deletion require a
//! superadmin.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AccountError, AccountResult};
pub use manager::AccountManager;
pub use models::{
    Account, AccountId, FieldPermissions, NewAccount, OtpChallenge, Role, UnknownRole,
};
