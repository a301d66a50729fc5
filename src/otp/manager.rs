//! Verification code lifecycle manager implementation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::code::{codes_match, generate_code, is_expired};
use super::errors::{OtpError, OtpResult};
use crate::account::{Account, AccountId};
use crate::config::OtpConfig;
use crate::db::AccountRepository;
use crate::email::{self, Mailer};

/// What an issued code is meant to prove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChallengePurpose {
    Registration,
    PasswordReset,
}

/// Verification code lifecycle manager
///
/// Issues codes, emails them out, and checks submissions against the single
/// pending challenge each account may hold. Issuing persists the challenge
/// before attempting delivery, so a failed send leaves a usable challenge
/// behind; callers surface the delivery failure without rolling back.
#[derive(Clone)]
pub struct OtpManager {
    accounts: Arc<dyn AccountRepository>,
    mailer: Arc<dyn Mailer>,
    expiry_secs: u64,
}

impl OtpManager {
    /// Create a new verification code manager
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account storage
    /// * `mailer` - Outbound email delivery
    /// * `config` - Code lifetime configuration
    ///
    /// # Returns
    ///
    /// * `OtpManager` - New manager instance
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        mailer: Arc<dyn Mailer>,
        config: &OtpConfig,
    ) -> Self {
        Self {
            accounts,
            mailer,
            expiry_secs: config.expiry_secs,
        }
    }

    /// Configured code lifetime in seconds
    pub fn expiry_secs(&self) -> u64 {
        self.expiry_secs
    }

    /// Issue a registration verification code for an account
    ///
    /// Any previously pending challenge is overwritten. The new challenge is
    /// persisted first and the code is then emailed to the account.
    ///
    /// # Arguments
    ///
    /// * `account_id` - Account to challenge
    ///
    /// # Returns
    ///
    /// * `OtpResult<DateTime<Utc>>` - Expiry of the issued code, or error
    ///
    /// # Errors
    ///
    /// * `OtpError::NotFound` - No such account
    /// * `OtpError::Email` - Challenge persisted but the email was not delivered
    pub async fn issue(&self, account_id: AccountId) -> OtpResult<DateTime<Utc>> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(OtpError::NotFound)?;

        self.issue_to(&mut account, ChallengePurpose::Registration)
            .await
    }

    /// Re-issue a registration verification code
    ///
    /// The previous code is overwritten and stops working immediately.
    ///
    /// # Errors
    ///
    /// * `OtpError::NotFound` - No such account
    /// * `OtpError::AlreadyVerified` - Account no longer needs verification
    /// * `OtpError::Email` - Challenge persisted but the email was not delivered
    pub async fn resend_registration(&self, account_id: AccountId) -> OtpResult<DateTime<Utc>> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(OtpError::NotFound)?;

        if account.is_verified {
            return Err(OtpError::AlreadyVerified);
        }

        self.issue_to(&mut account, ChallengePurpose::Registration)
            .await
    }

    /// Issue a password reset code to the account holding `email`
    ///
    /// Verified and unverified accounts alike may reset their password.
    ///
    /// # Errors
    ///
    /// * `OtpError::NotFound` - No account holds this email address
    /// * `OtpError::Email` - Challenge persisted but the email was not delivered
    pub async fn request_password_reset(&self, email: &str) -> OtpResult<DateTime<Utc>> {
        let mut account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(OtpError::NotFound)?;

        self.issue_to(&mut account, ChallengePurpose::PasswordReset)
            .await
    }

    /// Check a submitted registration code and mark the account verified
    ///
    /// On success the challenge is consumed; submitting the same code again
    /// fails. Checks run in a fixed order so an expired challenge is only
    /// reported as expired when the submitted code actually matches it.
    ///
    /// # Arguments
    ///
    /// * `account_id` - Account being verified
    /// * `code` - Submitted six-digit code
    ///
    /// # Errors
    ///
    /// * `OtpError::NotFound` - No such account
    /// * `OtpError::AlreadyVerified` - Account was verified earlier
    /// * `OtpError::InvalidCode` - Wrong code, or no challenge pending
    /// * `OtpError::Expired` - Matching code past its expiry
    pub async fn verify_registration(&self, account_id: AccountId, code: &str) -> OtpResult<()> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(OtpError::NotFound)?;

        if account.is_verified {
            return Err(OtpError::AlreadyVerified);
        }

        check_challenge(&account, code, Utc::now())?;

        account.is_verified = true;
        account.clear_challenge();
        self.accounts.update_account(&account).await?;

        log::info!("Account {} completed email verification", account.id);
        Ok(())
    }

    /// Check a submitted password reset code and consume the challenge
    ///
    /// Unlike registration, an already-verified account is the normal case
    /// here, so no verification state is checked or changed.
    ///
    /// # Arguments
    ///
    /// * `email` - Email address the reset was requested for
    /// * `code` - Submitted six-digit code
    ///
    /// # Returns
    ///
    /// * `OtpResult<Account>` - The account, with its challenge cleared
    ///
    /// # Errors
    ///
    /// * `OtpError::NotFound` - No account holds this email address
    /// * `OtpError::InvalidCode` - Wrong code, or no challenge pending
    /// * `OtpError::Expired` - Matching code past its expiry
    pub async fn verify_password_reset(&self, email: &str, code: &str) -> OtpResult<Account> {
        let mut account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(OtpError::NotFound)?;

        check_challenge(&account, code, Utc::now())?;

        account.clear_challenge();
        self.accounts.update_account(&account).await?;

        log::info!("Account {} passed password reset verification", account.id);
        Ok(account)
    }

    async fn issue_to(
        &self,
        account: &mut Account,
        purpose: ChallengePurpose,
    ) -> OtpResult<DateTime<Utc>> {
        let code = generate_code();
        let expires_at = Utc::now() + Duration::seconds(self.expiry_secs as i64);

        account.begin_challenge(code.clone(), expires_at);
        self.accounts.update_account(account).await?;

        let message = match purpose {
            ChallengePurpose::Registration => {
                email::verification_message(&account.email, &account.name, &code, self.expiry_secs)
            }
            ChallengePurpose::PasswordReset => {
                email::password_reset_message(&account.email, &account.name, &code, self.expiry_secs)
            }
        };

        if let Err(err) = self.mailer.send(&message).await {
            // The challenge stays persisted and usable; only delivery failed.
            log::error!(
                "Failed to send verification email for account {}: {err}",
                account.id
            );
            return Err(OtpError::Email(err));
        }

        log::info!(
            "Issued {} code for account {}, expires at {expires_at}",
            match purpose {
                ChallengePurpose::Registration => "verification",
                ChallengePurpose::PasswordReset => "password reset",
            },
            account.id
        );
        Ok(expires_at)
    }
}

/// Check a submitted code against an account's pending challenge.
///
/// Match is checked before expiry: a stale challenge with a non-matching code
/// reports `InvalidCode`, not `Expired`. An account without a pending
/// challenge reports `InvalidCode` as well.
fn check_challenge(account: &Account, code: &str, now: DateTime<Utc>) -> OtpResult<()> {
    let challenge = account.otp.as_ref().ok_or(OtpError::InvalidCode)?;

    if !codes_match(&challenge.code, code) {
        return Err(OtpError::InvalidCode);
    }

    if is_expired(challenge.expires_at, now) {
        return Err(OtpError::Expired);
    }

    Ok(())
}
