//! Account data models.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account ID type
pub type AccountId = i64;

/// Per-field customer record grants for non-admin accounts.
///
/// Keys are field names from [`crate::customer::fields`]; a missing key means
/// the field is not granted.
pub type FieldPermissions = HashMap<String, bool>;

/// Account role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    /// Stable string form, matching the stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Whether this role carries administrative privileges.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized role string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A pending email verification code.
///
/// The code and its expiry always travel together; an account either has a
/// full challenge or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// Six-digit code as sent to the account's email address
    pub code: String,
    /// Instant after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,
}

/// Account model
///
/// The password hash and any pending verification code are never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub otp: Option<OtpChallenge>,
    pub permissions: FieldPermissions,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Replace any pending challenge with a fresh one.
    pub fn begin_challenge(&mut self, code: String, expires_at: DateTime<Utc>) {
        self.otp = Some(OtpChallenge { code, expires_at });
    }

    /// Drop the pending challenge, if any.
    pub fn clear_challenge(&mut self) {
        self.otp = None;
    }
}

/// Data required to create an account.
///
/// New accounts always start as unverified users with no field grants and no
/// pending challenge; privileges are granted afterwards by a superadmin.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
}
