//! Account administration manager implementation.

use std::sync::Arc;

use super::errors::{AccountError, AccountResult};
use super::models::{Account, AccountId, FieldPermissions, Role};
use crate::auth::AccessTokenClaims;
use crate::db::AccountRepository;

/// Account administration manager
///
/// Covers the operations performed on accounts other than one's own login
/// flow: listing, role changes, field permission grants, and deletion. Every
/// operation takes the acting account's verified token claims and enforces
/// the role gate itself.
#[derive(Clone)]
pub struct AccountManager {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountManager {
    /// Create a new account administration manager
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// List all accounts
    ///
    /// # Errors
    ///
    /// * `AccountError::Forbidden` - Caller is not an admin or superadmin
    pub async fn list_accounts(&self, actor: &AccessTokenClaims) -> AccountResult<Vec<Account>> {
        require_admin(actor)?;
        Ok(self.accounts.list_accounts().await?)
    }

    /// Fetch a single account
    ///
    /// Accounts may always fetch themselves; fetching others requires an
    /// administrative role.
    ///
    /// # Errors
    ///
    /// * `AccountError::Forbidden` - Caller is neither the target nor an admin
    /// * `AccountError::NotFound` - No such account
    pub async fn get_account(
        &self,
        actor: &AccessTokenClaims,
        account_id: AccountId,
    ) -> AccountResult<Account> {
        if actor.sub != account_id {
            require_admin(actor)?;
        }

        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    /// Change an account's role
    ///
    /// Any role may be assigned to any account, including demoting or
    /// promoting the caller themselves; only superadmins may do it.
    ///
    /// # Errors
    ///
    /// * `AccountError::Forbidden` - Caller is not a superadmin
    /// * `AccountError::NotFound` - No such account
    pub async fn set_role(
        &self,
        actor: &AccessTokenClaims,
        account_id: AccountId,
        role: Role,
    ) -> AccountResult<Account> {
        require_superadmin(actor)?;

        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let previous = account.role;
        account.role = role;
        self.accounts.update_account(&account).await?;

        log::info!(
            "Account {} role changed {previous} -> {role} by account {}",
            account.id,
            actor.sub
        );
        Ok(account)
    }

    /// Replace an account's customer field grants wholesale
    ///
    /// Grants only matter for accounts with the `user` role; admin roles see
    /// every field regardless. Keys are not validated against the known field
    /// names, matching the open-ended shape they are stored with.
    ///
    /// # Errors
    ///
    /// * `AccountError::Forbidden` - Caller is not a superadmin
    /// * `AccountError::NotFound` - No such account
    pub async fn set_field_permissions(
        &self,
        actor: &AccessTokenClaims,
        account_id: AccountId,
        permissions: FieldPermissions,
    ) -> AccountResult<Account> {
        require_superadmin(actor)?;

        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)?;

        account.permissions = permissions;
        self.accounts.update_account(&account).await?;

        log::info!(
            "Account {} field permissions replaced by account {}",
            account.id,
            actor.sub
        );
        Ok(account)
    }

    /// Delete an account
    ///
    /// # Errors
    ///
    /// * `AccountError::Forbidden` - Caller is not a superadmin
    /// * `AccountError::NotFound` - No such account
    pub async fn delete_account(
        &self,
        actor: &AccessTokenClaims,
        account_id: AccountId,
    ) -> AccountResult<()> {
        require_superadmin(actor)?;

        if !self.accounts.delete_account(account_id).await? {
            return Err(AccountError::NotFound);
        }

        log::info!("Account {account_id} deleted by account {}", actor.sub);
        Ok(())
    }
}

fn require_admin(actor: &AccessTokenClaims) -> AccountResult<()> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(AccountError::Forbidden {
            required: Role::Admin,
        })
    }
}

fn require_superadmin(actor: &AccessTokenClaims) -> AccountResult<()> {
    if actor.role == Role::Superadmin {
        Ok(())
    } else {
        Err(AccountError::Forbidden {
            required: Role::Superadmin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: AccountId, role: Role) -> AccessTokenClaims {
        AccessTokenClaims {
            sub,
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_require_admin_accepts_both_admin_roles() {
        assert!(require_admin(&claims(1, Role::Admin)).is_ok());
        assert!(require_admin(&claims(1, Role::Superadmin)).is_ok());

        let err = require_admin(&claims(1, Role::User)).unwrap_err();
        assert!(matches!(
            err,
            AccountError::Forbidden {
                required: Role::Admin
            }
        ));
    }

    #[test]
    fn test_require_superadmin_rejects_plain_admin() {
        assert!(require_superadmin(&claims(1, Role::Superadmin)).is_ok());

        let err = require_superadmin(&claims(1, Role::Admin)).unwrap_err();
        assert!(matches!(
            err,
            AccountError::Forbidden {
                required: Role::Superadmin
            }
        ));
    }
}
