//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountId, Role};

/// Account registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

/// Outcome of a successful registration.
///
/// The account exists and a verification code is on its way to the given
/// email address; the session starts only after verification and login.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub account_id: AccountId,
    pub otp_expires_at: DateTime<Utc>,
}

/// Account login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// JWT claims for access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: AccountId, // Account ID
    pub role: Role,
    pub exp: i64, // Expiration timestamp
    pub iat: i64, // Issued at timestamp
}
