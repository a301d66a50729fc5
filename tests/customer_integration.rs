//! Integration tests for customer records, lookup tables, and about content.
//!
//! Tests CRUD with per-field grants, lookup table maintenance with in-use
//! protection, and the editable about page, against the in-memory backends.

use std::sync::Arc;

use chrono::Utc;
use coolcrm::account::{Account, AccountId, FieldPermissions, Role};
use coolcrm::auth::AccessTokenClaims;
use coolcrm::customer::{
    CustomerError, CustomerManager, CustomerPatch, LookupKind, NewCustomer, fields,
};
use coolcrm::db::{
    AccountRepository, CustomerRepository, MemoryAccountRepository, MemoryCustomerRepository,
};

fn claims(sub: AccountId, role: Role) -> AccessTokenClaims {
    AccessTokenClaims {
        sub,
        role,
        exp: 0,
        iat: 0,
    }
}

fn account(id: AccountId, email: &str, role: Role) -> Account {
    Account {
        id,
        name: format!("Account {id}"),
        email: email.to_string(),
        mobile: "5550100".to_string(),
        password_hash: "irrelevant".to_string(),
        role,
        is_verified: true,
        otp: None,
        permissions: FieldPermissions::new(),
        created_at: Utc::now(),
    }
}

fn new_customer(name: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        mobile: "5550142".to_string(),
        email: Some("ops@meridian.example".to_string()),
        address: "12 Harbor Rd".to_string(),
        category_id: None,
        cooling_type_id: None,
        notes: Some("prefers morning visits".to_string()),
    }
}

/// Helper to build a customer manager over one account of each role
fn setup_customer_manager() -> (
    CustomerManager,
    Arc<MemoryAccountRepository>,
    Arc<MemoryCustomerRepository>,
) {
    let accounts = Arc::new(
        MemoryAccountRepository::new()
            .with_account(account(1, "root@example.com", Role::Superadmin))
            .with_account(account(2, "staff@example.com", Role::Admin))
            .with_account(account(3, "user@example.com", Role::User)),
    );
    let customers = Arc::new(MemoryCustomerRepository::new());
    let manager = CustomerManager::new(customers.clone(), accounts.clone());
    (manager, accounts, customers)
}

/// Helper to set account 3's field grants directly in storage
async fn grant_fields(accounts: &MemoryAccountRepository, granted: &[&str]) {
    let mut account = accounts
        .find_by_id(3)
        .await
        .expect("Account lookup should succeed")
        .expect("Account should exist");
    account.permissions = granted
        .iter()
        .map(|field| (field.to_string(), true))
        .collect();
    accounts
        .update_account(&account)
        .await
        .expect("Update should succeed");
}

#[tokio::test]
async fn test_admin_crud_round_trip() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");
    assert_eq!(created.name.as_deref(), Some("Meridian Foods"));
    assert_eq!(created.mobile.as_deref(), Some("5550142"));

    let fetched = manager
        .get_customer(&admin, created.id)
        .await
        .expect("Fetch should succeed");
    assert_eq!(fetched, created);

    manager
        .create_customer(&admin, new_customer("Harbor Fresh"))
        .await
        .expect("Second creation should succeed");

    let listed = manager
        .list_customers(&admin)
        .await
        .expect("Listing should succeed");
    assert_eq!(listed.len(), 2);
    assert!(
        listed.windows(2).all(|pair| pair[0].id < pair[1].id),
        "Listing should be ordered by ID"
    );
}

#[tokio::test]
async fn test_user_views_are_projected_through_grants() {
    let (manager, accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);
    let user = claims(3, Role::User);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");

    grant_fields(&accounts, &[fields::NAME, fields::MOBILE]).await;

    let view = manager
        .get_customer(&user, created.id)
        .await
        .expect("Fetch should succeed");
    assert_eq!(view.name.as_deref(), Some("Meridian Foods"));
    assert_eq!(view.mobile.as_deref(), Some("5550142"));
    assert_eq!(view.email, None, "Ungranted fields should be blanked");
    assert_eq!(view.address, None);
    assert_eq!(view.notes, None);
    assert_eq!(view.id, created.id, "The ID is not a grantable field");

    let listed = manager
        .list_customers(&user)
        .await
        .expect("Listing should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], view);
}

#[tokio::test]
async fn test_user_update_respects_field_grants() {
    let (manager, accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);
    let user = claims(3, Role::User);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");

    grant_fields(&accounts, &[fields::MOBILE]).await;

    let updated = manager
        .update_customer(
            &user,
            created.id,
            CustomerPatch {
                mobile: Some("5550199".to_string()),
                ..CustomerPatch::default()
            },
        )
        .await
        .expect("Granted update should succeed");
    assert_eq!(updated.mobile.as_deref(), Some("5550199"));
    assert_eq!(updated.name, None, "The response is projected too");

    let err = manager
        .update_customer(
            &user,
            created.id,
            CustomerPatch {
                notes: Some("call first".to_string()),
                ..CustomerPatch::default()
            },
        )
        .await
        .expect_err("Ungranted update should fail");
    assert!(matches!(err, CustomerError::FieldNotPermitted(field) if field == fields::NOTES));

    // The rejected patch changed nothing.
    let view = manager
        .get_customer(&admin, created.id)
        .await
        .expect("Fetch should succeed");
    assert_eq!(view.notes.as_deref(), Some("prefers morning visits"));
}

#[tokio::test]
async fn test_update_rejects_blank_name_and_unknown_lookup() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");

    let err = manager
        .update_customer(
            &admin,
            created.id,
            CustomerPatch {
                name: Some("   ".to_string()),
                ..CustomerPatch::default()
            },
        )
        .await
        .expect_err("Blank name should be rejected");
    assert!(matches!(err, CustomerError::EmptyName));

    let err = manager
        .update_customer(
            &admin,
            created.id,
            CustomerPatch {
                category_id: Some(42),
                ..CustomerPatch::default()
            },
        )
        .await
        .expect_err("Unknown category should be rejected");
    assert!(matches!(
        err,
        CustomerError::UnknownLookup {
            kind: LookupKind::Category,
            id: 42
        }
    ));
}

#[tokio::test]
async fn test_empty_patch_changes_nothing() {
    let (manager, _accounts, customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");
    let before = customers
        .find_customer(created.id)
        .await
        .expect("Lookup should succeed")
        .expect("Customer should exist");

    manager
        .update_customer(&admin, created.id, CustomerPatch::default())
        .await
        .expect("Empty patch should be accepted");

    let after = customers
        .find_customer(created.id)
        .await
        .expect("Lookup should succeed")
        .expect("Customer should exist");
    assert_eq!(after.updated_at, before.updated_at, "No write should happen");
}

#[tokio::test]
async fn test_create_validates_name_and_lookups() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);

    let err = manager
        .create_customer(&admin, new_customer("  "))
        .await
        .expect_err("Blank name should be rejected");
    assert!(matches!(err, CustomerError::EmptyName));

    let mut customer = new_customer("Meridian Foods");
    customer.cooling_type_id = Some(7);
    let err = manager
        .create_customer(&admin, customer)
        .await
        .expect_err("Unknown cooling type should be rejected");
    assert!(matches!(
        err,
        CustomerError::UnknownLookup {
            kind: LookupKind::CoolingType,
            id: 7
        }
    ));
}

#[tokio::test]
async fn test_delete_customer_requires_admin() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);
    let user = claims(3, Role::User);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");

    let err = manager
        .delete_customer(&user, created.id)
        .await
        .expect_err("User should not delete customers");
    assert!(matches!(
        err,
        CustomerError::Forbidden {
            required: Role::Admin
        }
    ));

    manager
        .delete_customer(&admin, created.id)
        .await
        .expect("Admin should delete customers");

    let err = manager
        .get_customer(&admin, created.id)
        .await
        .expect_err("Deleted customer should be gone");
    assert!(matches!(err, CustomerError::NotFound));
}

#[tokio::test]
async fn test_lookup_maintenance_requires_admin() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);
    let user = claims(3, Role::User);

    let entry = manager
        .add_lookup(&admin, LookupKind::Category, "  Restaurant  ")
        .await
        .expect("Admin should add lookup entries");
    assert_eq!(entry.name, "Restaurant", "Names should be trimmed");

    let err = manager
        .add_lookup(&user, LookupKind::Category, "Hotel")
        .await
        .expect_err("User should not add lookup entries");
    assert!(matches!(err, CustomerError::Forbidden { .. }));

    let err = manager
        .add_lookup(&admin, LookupKind::Category, "   ")
        .await
        .expect_err("Blank name should be rejected");
    assert!(matches!(err, CustomerError::EmptyName));

    // Listing is open to every caller.
    manager
        .add_lookup(&admin, LookupKind::Category, "Bakery")
        .await
        .expect("Second entry should succeed");
    let listed = manager
        .list_lookups(LookupKind::Category)
        .await
        .expect("Listing should succeed");
    let names: Vec<&str> = listed.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["Bakery", "Restaurant"], "Sorted by name");
}

#[tokio::test]
async fn test_remove_lookup_protects_entries_in_use() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);

    let entry = manager
        .add_lookup(&admin, LookupKind::CoolingType, "Walk-in freezer")
        .await
        .expect("Entry should be added");

    let mut customer = new_customer("Meridian Foods");
    customer.cooling_type_id = Some(entry.id);
    let created = manager
        .create_customer(&admin, customer)
        .await
        .expect("Creation should succeed");

    let err = manager
        .remove_lookup(&admin, LookupKind::CoolingType, entry.id)
        .await
        .expect_err("An entry in use should not be removable");
    assert!(matches!(
        err,
        CustomerError::LookupInUse {
            kind: LookupKind::CoolingType,
            ..
        }
    ));

    manager
        .delete_customer(&admin, created.id)
        .await
        .expect("Deletion should succeed");
    manager
        .remove_lookup(&admin, LookupKind::CoolingType, entry.id)
        .await
        .expect("An unused entry should be removable");

    let err = manager
        .remove_lookup(&admin, LookupKind::CoolingType, entry.id)
        .await
        .expect_err("Removing again should fail");
    assert!(matches!(err, CustomerError::UnknownLookup { .. }));
}

#[tokio::test]
async fn test_about_content_is_admin_edited_and_open_to_read() {
    let (manager, _accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);
    let user = claims(3, Role::User);

    let initial = manager.about().await.expect("Read should succeed");
    assert!(initial.is_none(), "No content until an admin writes some");

    let err = manager
        .set_about(&user, "About us", "We fix coolers.")
        .await
        .expect_err("User should not edit about content");
    assert!(matches!(err, CustomerError::Forbidden { .. }));

    manager
        .set_about(&admin, "About us", "We fix coolers.")
        .await
        .expect("Admin should edit about content");

    let replaced = manager
        .set_about(&admin, "About CoolCRM", "We fix coolers, fast.")
        .await
        .expect("A second write should overwrite");

    let current = manager
        .about()
        .await
        .expect("Read should succeed")
        .expect("Content should exist");
    assert_eq!(current.title, "About CoolCRM");
    assert_eq!(current.body, "We fix coolers, fast.");
    assert_eq!(current, replaced);
}

#[tokio::test]
async fn test_missing_actor_account_is_reported() {
    let (manager, accounts, _customers) = setup_customer_manager();
    let admin = claims(2, Role::Admin);
    let user = claims(3, Role::User);

    let created = manager
        .create_customer(&admin, new_customer("Meridian Foods"))
        .await
        .expect("Creation should succeed");

    // The token outlives the account it was issued to.
    accounts
        .delete_account(3)
        .await
        .expect("Deletion should succeed");

    let err = manager
        .get_customer(&user, created.id)
        .await
        .expect_err("A deleted actor should be rejected");
    assert!(matches!(err, CustomerError::ActorMissing));

    let err = manager
        .list_customers(&user)
        .await
        .expect_err("A deleted actor should be rejected");
    assert!(matches!(err, CustomerError::ActorMissing));
}
