//! Authentication manager implementation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::errors::{AuthError, AuthResult};
use super::models::{
    AccessTokenClaims, LoginRequest, LoginResponse, RegisterRequest, RegistrationReceipt,
};
use super::password::{hash_password, validate_email, validate_password, verify_password};
use crate::account::{AccountId, NewAccount, Role};
use crate::config::SecurityConfig;
use crate::db::{AccountRepository, StoreError};
use crate::otp::OtpManager;

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    accounts: Arc<dyn AccountRepository>,
    otp: OtpManager,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account storage
    /// * `otp` - Verification code manager used during registration
    /// * `config` - JWT secret and token lifetime
    ///
    /// # Returns
    ///
    /// * `AuthManager` - New authentication manager instance
    pub fn new(accounts: Arc<dyn AccountRepository>, otp: OtpManager, config: &SecurityConfig) -> Self {
        Self {
            accounts,
            otp,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: Duration::seconds(config.token_ttl_secs as i64),
        }
    }

    /// Register a new account
    ///
    /// Creates the account unverified, then issues a verification code and
    /// emails it out. The account is persisted before the email is attempted;
    /// a delivery failure surfaces as an error but does not roll the account
    /// back, and its challenge stays usable.
    ///
    /// # Arguments
    ///
    /// * `request` - Registration request with name, email, mobile and password
    ///
    /// # Returns
    ///
    /// * `AuthResult<RegistrationReceipt>` - New account ID and code expiry
    ///
    /// # Errors
    ///
    /// * `AuthError::MissingField` - Name or mobile is empty
    /// * `AuthError::InvalidEmail` - Email format invalid
    /// * `AuthError::WeakPassword` - Password too weak
    /// * `AuthError::DuplicateEmail` - Email already registered
    /// * `AuthError::Otp` - Account created but the verification email failed
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<RegistrationReceipt> {
        if request.name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if request.mobile.trim().is_empty() {
            return Err(AuthError::MissingField("mobile"));
        }
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        // Check if email exists
        if self
            .accounts
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hash_password(&request.password)?;
        let new_account = NewAccount {
            name: request.name,
            email: request.email,
            mobile: request.mobile,
            password_hash,
        };

        // The store enforces email uniqueness too; a concurrent registration
        // loses here rather than at the earlier check.
        let account_id = match self.accounts.create_account(&new_account).await {
            Ok(id) => id,
            Err(StoreError::DuplicateEmail) => return Err(AuthError::DuplicateEmail),
            Err(err) => return Err(err.into()),
        };

        let otp_expires_at = self.otp.issue(account_id).await?;

        log::info!("Registered account {account_id}, verification pending");
        Ok(RegistrationReceipt {
            account_id,
            otp_expires_at,
        })
    }

    /// Log an account in
    ///
    /// An unknown email and a wrong password both report `InvalidCredentials`;
    /// login does not reveal whether an email is registered. The verification
    /// gate comes first: an unverified account is told to verify, not to retry
    /// its password.
    ///
    /// # Arguments
    ///
    /// * `request` - Login request with email and password
    ///
    /// # Returns
    ///
    /// * `AuthResult<LoginResponse>` - Signed access token and account summary
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password
    /// * `AuthError::NotVerified` - Account has not completed email verification
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let account = self
            .accounts
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_verified {
            return Err(AuthError::NotVerified);
        }

        verify_password(&request.password, &account.password_hash)?;

        let token = self.generate_access_token(account.id, account.role)?;

        Ok(LoginResponse {
            token,
            account_id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
        })
    }

    /// Complete a password reset with a previously emailed code
    ///
    /// The code is checked and consumed through the verification code
    /// manager; see [`OtpManager::request_password_reset`] for issuing one.
    ///
    /// # Arguments
    ///
    /// * `email` - Email address the reset was requested for
    /// * `code` - Submitted six-digit code
    /// * `new_password` - Replacement password
    ///
    /// # Errors
    ///
    /// * `AuthError::WeakPassword` - Replacement password too weak
    /// * `AuthError::Otp` - Unknown email, wrong code, or expired code
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        validate_password(new_password)?;

        let mut account = self.otp.verify_password_reset(email, code).await?;
        account.password_hash = hash_password(new_password)?;
        self.accounts.update_account(&account).await?;

        log::info!("Password reset completed for account {}", account.id);
        Ok(())
    }

    /// Verify an access token
    ///
    /// # Arguments
    ///
    /// * `token` - JWT access token
    ///
    /// # Returns
    ///
    /// * `AuthResult<AccessTokenClaims>` - Decoded claims or error
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Generate JWT access token
    fn generate_access_token(&self, account_id: AccountId, role: Role) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: account_id,
            role,
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }
}
