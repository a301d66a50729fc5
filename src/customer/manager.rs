//! Customer record manager implementation.

use std::sync::Arc;

use chrono::Utc;

use super::errors::{CustomerError, CustomerResult};
use super::models::{
    AboutContent, Customer, CustomerId, CustomerPatch, CustomerView, LookupEntry, LookupId,
    LookupKind, NewCustomer,
};
use crate::account::{FieldPermissions, Role};
use crate::auth::AccessTokenClaims;
use crate::db::{AccountRepository, CustomerRepository};

/// Customer record manager
///
/// All operations take the acting account's verified token claims. Admin
/// roles see and edit every field; `user` accounts see and edit only the
/// fields a superadmin has granted them. Record deletion and lookup table
/// maintenance require an admin role.
#[derive(Clone)]
pub struct CustomerManager {
    customers: Arc<dyn CustomerRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl CustomerManager {
    /// Create a new customer record manager
    ///
    /// # Arguments
    ///
    /// * `customers` - Customer record storage
    /// * `accounts` - Account storage, read for the caller's field grants
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self {
            customers,
            accounts,
        }
    }

    /// Create a customer record
    ///
    /// Every role may create records; field grants only govern viewing and
    /// updating existing ones.
    ///
    /// # Errors
    ///
    /// * `CustomerError::EmptyName` - Customer name is blank
    /// * `CustomerError::UnknownLookup` - Referenced category or cooling type missing
    pub async fn create_customer(
        &self,
        actor: &AccessTokenClaims,
        customer: NewCustomer,
    ) -> CustomerResult<CustomerView> {
        if customer.name.trim().is_empty() {
            return Err(CustomerError::EmptyName);
        }
        if let Some(id) = customer.category_id {
            self.require_lookup(LookupKind::Category, id).await?;
        }
        if let Some(id) = customer.cooling_type_id {
            self.require_lookup(LookupKind::CoolingType, id).await?;
        }

        let created = self.customers.create_customer(&customer).await?;
        log::debug!("Customer {} created by account {}", created.id, actor.sub);

        let grants = self.grants_for(actor).await?;
        Ok(CustomerView::project(&created, grants.as_ref()))
    }

    /// Fetch a customer record, projected through the caller's field grants
    ///
    /// # Errors
    ///
    /// * `CustomerError::NotFound` - No such customer
    pub async fn get_customer(
        &self,
        actor: &AccessTokenClaims,
        customer_id: CustomerId,
    ) -> CustomerResult<CustomerView> {
        let customer = self
            .customers
            .find_customer(customer_id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        let grants = self.grants_for(actor).await?;
        Ok(CustomerView::project(&customer, grants.as_ref()))
    }

    /// List customer records, each projected through the caller's field grants
    pub async fn list_customers(
        &self,
        actor: &AccessTokenClaims,
    ) -> CustomerResult<Vec<CustomerView>> {
        let grants = self.grants_for(actor).await?;
        let customers = self.customers.list_customers().await?;

        Ok(customers
            .iter()
            .map(|customer| CustomerView::project(customer, grants.as_ref()))
            .collect())
    }

    /// Update a customer record
    ///
    /// A `user` caller must hold a grant for every field the patch touches;
    /// the first ungranted field aborts the whole update. Writes are
    /// last-writer-wins, matching the storage contract.
    ///
    /// # Errors
    ///
    /// * `CustomerError::NotFound` - No such customer
    /// * `CustomerError::FieldNotPermitted` - Caller lacks a grant for a touched field
    /// * `CustomerError::UnknownLookup` - Patched category or cooling type missing
    pub async fn update_customer(
        &self,
        actor: &AccessTokenClaims,
        customer_id: CustomerId,
        patch: CustomerPatch,
    ) -> CustomerResult<CustomerView> {
        let mut customer = self
            .customers
            .find_customer(customer_id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        let grants = self.grants_for(actor).await?;
        if let Some(grants) = &grants {
            for field in patch.touched_fields() {
                if !grants.get(field).copied().unwrap_or(false) {
                    return Err(CustomerError::FieldNotPermitted(field.to_string()));
                }
            }
        }

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(CustomerError::EmptyName);
            }
        }
        if let Some(id) = patch.category_id {
            self.require_lookup(LookupKind::Category, id).await?;
        }
        if let Some(id) = patch.cooling_type_id {
            self.require_lookup(LookupKind::CoolingType, id).await?;
        }

        if !patch.is_empty() {
            apply_patch(&mut customer, patch);
            customer.updated_at = Utc::now();
            self.customers.update_customer(&customer).await?;
        }

        Ok(CustomerView::project(&customer, grants.as_ref()))
    }

    /// Delete a customer record
    ///
    /// # Errors
    ///
    /// * `CustomerError::Forbidden` - Caller is not an admin or superadmin
    /// * `CustomerError::NotFound` - No such customer
    pub async fn delete_customer(
        &self,
        actor: &AccessTokenClaims,
        customer_id: CustomerId,
    ) -> CustomerResult<()> {
        require_admin(actor)?;

        if !self.customers.delete_customer(customer_id).await? {
            return Err(CustomerError::NotFound);
        }

        log::info!("Customer {customer_id} deleted by account {}", actor.sub);
        Ok(())
    }

    /// Add an entry to a lookup table
    ///
    /// # Errors
    ///
    /// * `CustomerError::Forbidden` - Caller is not an admin or superadmin
    /// * `CustomerError::EmptyName` - Entry name is blank
    pub async fn add_lookup(
        &self,
        actor: &AccessTokenClaims,
        kind: LookupKind,
        name: &str,
    ) -> CustomerResult<LookupEntry> {
        require_admin(actor)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerError::EmptyName);
        }

        let entry = self.customers.add_lookup(kind, name).await?;
        log::info!(
            "{} {:?} added by account {}",
            kind.as_str(),
            entry.name,
            actor.sub
        );
        Ok(entry)
    }

    /// List a lookup table's entries
    ///
    /// Ungated; every role reads these to fill record forms.
    pub async fn list_lookups(&self, kind: LookupKind) -> CustomerResult<Vec<LookupEntry>> {
        Ok(self.customers.list_lookups(kind).await?)
    }

    /// Remove a lookup entry
    ///
    /// Entries still referenced by customer records cannot be removed.
    ///
    /// # Errors
    ///
    /// * `CustomerError::Forbidden` - Caller is not an admin or superadmin
    /// * `CustomerError::LookupInUse` - A customer record still references the entry
    /// * `CustomerError::UnknownLookup` - No such entry
    pub async fn remove_lookup(
        &self,
        actor: &AccessTokenClaims,
        kind: LookupKind,
        id: LookupId,
    ) -> CustomerResult<()> {
        require_admin(actor)?;

        if self.customers.lookup_in_use(kind, id).await? {
            return Err(CustomerError::LookupInUse { kind, id });
        }

        if !self.customers.remove_lookup(kind, id).await? {
            return Err(CustomerError::UnknownLookup { kind, id });
        }

        log::info!("{} {id} removed by account {}", kind.as_str(), actor.sub);
        Ok(())
    }

    /// Fetch the about-page content, if any has been set
    ///
    /// Ungated; the page is public within the application.
    pub async fn about(&self) -> CustomerResult<Option<AboutContent>> {
        Ok(self.customers.get_about().await?)
    }

    /// Replace the about-page content
    ///
    /// # Errors
    ///
    /// * `CustomerError::Forbidden` - Caller is not an admin or superadmin
    pub async fn set_about(
        &self,
        actor: &AccessTokenClaims,
        title: &str,
        body: &str,
    ) -> CustomerResult<AboutContent> {
        require_admin(actor)?;

        let about = AboutContent {
            title: title.to_string(),
            body: body.to_string(),
            updated_at: Utc::now(),
        };
        self.customers.set_about(&about).await?;

        log::info!("About content replaced by account {}", actor.sub);
        Ok(about)
    }

    /// Field grants in effect for the caller; `None` means unrestricted.
    async fn grants_for(
        &self,
        actor: &AccessTokenClaims,
    ) -> CustomerResult<Option<FieldPermissions>> {
        if actor.role.is_admin() {
            return Ok(None);
        }

        let account = self
            .accounts
            .find_by_id(actor.sub)
            .await?
            .ok_or(CustomerError::ActorMissing)?;
        Ok(Some(account.permissions))
    }

    async fn require_lookup(&self, kind: LookupKind, id: LookupId) -> CustomerResult<()> {
        if self.customers.lookup_exists(kind, id).await? {
            Ok(())
        } else {
            Err(CustomerError::UnknownLookup { kind, id })
        }
    }
}

fn require_admin(actor: &AccessTokenClaims) -> CustomerResult<()> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(CustomerError::Forbidden {
            required: Role::Admin,
        })
    }
}

fn apply_patch(customer: &mut Customer, patch: CustomerPatch) {
    if let Some(name) = patch.name {
        customer.name = name;
    }
    if let Some(mobile) = patch.mobile {
        customer.mobile = mobile;
    }
    if let Some(email) = patch.email {
        customer.email = Some(email);
    }
    if let Some(address) = patch.address {
        customer.address = address;
    }
    if let Some(category_id) = patch.category_id {
        customer.category_id = Some(category_id);
    }
    if let Some(cooling_type_id) = patch.cooling_type_id {
        customer.cooling_type_id = Some(cooling_type_id);
    }
    if let Some(notes) = patch.notes {
        customer.notes = Some(notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_apply_patch_leaves_untouched_fields() {
        let now = Utc::now();
        let mut customer = Customer {
            id: 1,
            name: "Meridian Foods".to_string(),
            mobile: "5550142".to_string(),
            email: None,
            address: "12 Harbor Rd".to_string(),
            category_id: Some(2),
            cooling_type_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        apply_patch(
            &mut customer,
            CustomerPatch {
                mobile: Some("5550199".to_string()),
                notes: Some("call first".to_string()),
                ..CustomerPatch::default()
            },
        );

        assert_eq!(customer.name, "Meridian Foods");
        assert_eq!(customer.mobile, "5550199");
        assert_eq!(customer.category_id, Some(2));
        assert_eq!(customer.notes.as_deref(), Some("call first"));
    }
}
