//! In-memory repository implementations.
//!
//! These back the integration tests and local development without a running
//! PostgreSQL instance, while enforcing the same contracts as the SQL
//! implementations (email uniqueness, insertion-ordered listings).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::account::{Account, AccountId, FieldPermissions, NewAccount, Role};
use crate::customer::{
    AboutContent, Customer, CustomerId, LookupEntry, LookupId, LookupKind, NewCustomer,
};
use crate::db::errors::{StoreError, StoreResult};
use crate::db::repository::{AccountRepository, CustomerRepository};

/// In-memory implementation of `AccountRepository`
pub struct MemoryAccountRepository {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
    next_id: Arc<Mutex<AccountId>>,
}

impl Default for MemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Preload an account, keeping the ID counter ahead of it.
    pub fn with_account(self, account: Account) -> Self {
        {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id = (*next_id).max(account.id + 1);
            self.accounts.lock().unwrap().insert(account.id, account);
        }
        self
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn create_account(&self, account: &NewAccount) -> StoreResult<AccountId> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        accounts.insert(
            id,
            Account {
                id,
                name: account.name.clone(),
                email: account.email.clone(),
                mobile: account.mobile.clone(),
                password_hash: account.password_hash.clone(),
                role: Role::User,
                is_verified: false,
                otp: None,
                permissions: FieldPermissions::new(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, account_id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(&account_id).cloned())
    }

    async fn update_account(&self, account: &Account) -> StoreResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(StoreError::DuplicateEmail);
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_account(&self, account_id: AccountId) -> StoreResult<bool> {
        Ok(self.accounts.lock().unwrap().remove(&account_id).is_some())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.lock().unwrap().values().cloned().collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }
}

struct LookupTable {
    entries: HashMap<LookupId, String>,
    next_id: LookupId,
}

impl LookupTable {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory implementation of `CustomerRepository`
pub struct MemoryCustomerRepository {
    customers: Arc<Mutex<HashMap<CustomerId, Customer>>>,
    next_id: Arc<Mutex<CustomerId>>,
    categories: Arc<Mutex<LookupTable>>,
    cooling_types: Arc<Mutex<LookupTable>>,
    about: Arc<Mutex<Option<AboutContent>>>,
}

impl Default for MemoryCustomerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self {
            customers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
            categories: Arc::new(Mutex::new(LookupTable::new())),
            cooling_types: Arc::new(Mutex::new(LookupTable::new())),
            about: Arc::new(Mutex::new(None)),
        }
    }

    fn table(&self, kind: LookupKind) -> &Arc<Mutex<LookupTable>> {
        match kind {
            LookupKind::Category => &self.categories,
            LookupKind::CoolingType => &self.cooling_types,
        }
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create_customer(&self, customer: &NewCustomer) -> StoreResult<Customer> {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let now = Utc::now();
        let record = Customer {
            id,
            name: customer.name.clone(),
            mobile: customer.mobile.clone(),
            email: customer.email.clone(),
            address: customer.address.clone(),
            category_id: customer.category_id,
            cooling_type_id: customer.cooling_type_id,
            notes: customer.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.customers.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn find_customer(&self, customer_id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.customers.lock().unwrap().get(&customer_id).cloned())
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let mut customers: Vec<Customer> =
            self.customers.lock().unwrap().values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<()> {
        self.customers
            .lock()
            .unwrap()
            .insert(customer.id, customer.clone());
        Ok(())
    }

    async fn delete_customer(&self, customer_id: CustomerId) -> StoreResult<bool> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .remove(&customer_id)
            .is_some())
    }

    async fn add_lookup(&self, kind: LookupKind, name: &str) -> StoreResult<LookupEntry> {
        let mut table = self.table(kind).lock().unwrap();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.insert(id, name.to_string());
        Ok(LookupEntry {
            id,
            name: name.to_string(),
        })
    }

    async fn list_lookups(&self, kind: LookupKind) -> StoreResult<Vec<LookupEntry>> {
        let table = self.table(kind).lock().unwrap();
        let mut entries: Vec<LookupEntry> = table
            .entries
            .iter()
            .map(|(&id, name)| LookupEntry {
                id,
                name: name.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn remove_lookup(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool> {
        Ok(self
            .table(kind)
            .lock()
            .unwrap()
            .entries
            .remove(&id)
            .is_some())
    }

    async fn lookup_exists(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool> {
        Ok(self.table(kind).lock().unwrap().entries.contains_key(&id))
    }

    async fn lookup_in_use(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool> {
        let customers = self.customers.lock().unwrap();
        let in_use = match kind {
            LookupKind::Category => customers.values().any(|c| c.category_id == Some(id)),
            LookupKind::CoolingType => customers.values().any(|c| c.cooling_type_id == Some(id)),
        };
        Ok(in_use)
    }

    async fn get_about(&self) -> StoreResult<Option<AboutContent>> {
        Ok(self.about.lock().unwrap().clone())
    }

    async fn set_about(&self, about: &AboutContent) -> StoreResult<()> {
        *self.about.lock().unwrap() = Some(about.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Test Account".to_string(),
            email: email.to_string(),
            mobile: "5550100".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_account_assigns_sequential_ids() {
        let repo = MemoryAccountRepository::new();

        let first = repo.create_account(&new_account("a@example.com")).await.unwrap();
        let second = repo.create_account(&new_account("b@example.com")).await.unwrap();

        assert_eq!(first, 1, "First account should have ID 1");
        assert_eq!(second, 2, "Second account should have ID 2");
    }

    #[tokio::test]
    async fn test_create_account_defaults() {
        let repo = MemoryAccountRepository::new();
        let id = repo.create_account(&new_account("a@example.com")).await.unwrap();

        let account = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::User);
        assert!(!account.is_verified);
        assert!(account.otp.is_none());
        assert!(account.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicate_email() {
        let repo = MemoryAccountRepository::new();
        repo.create_account(&new_account("a@example.com")).await.unwrap();

        let err = repo
            .create_account(&new_account("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_update_account_rejects_email_collision() {
        let repo = MemoryAccountRepository::new();
        repo.create_account(&new_account("a@example.com")).await.unwrap();
        let id = repo.create_account(&new_account("b@example.com")).await.unwrap();

        let mut account = repo.find_by_id(id).await.unwrap().unwrap();
        account.email = "a@example.com".to_string();

        let err = repo.update_account(&account).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_with_account_keeps_id_counter_ahead() {
        let preloaded = Account {
            id: 10,
            name: "Preloaded".to_string(),
            email: "pre@example.com".to_string(),
            mobile: "5550101".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            is_verified: true,
            otp: None,
            permissions: FieldPermissions::new(),
            created_at: Utc::now(),
        };

        let repo = MemoryAccountRepository::new().with_account(preloaded);
        let id = repo.create_account(&new_account("new@example.com")).await.unwrap();
        assert_eq!(id, 11, "Counter should move past preloaded IDs");
    }

    #[tokio::test]
    async fn test_delete_account_reports_removal() {
        let repo = MemoryAccountRepository::new();
        let id = repo.create_account(&new_account("a@example.com")).await.unwrap();

        assert!(repo.delete_account(id).await.unwrap());
        assert!(!repo.delete_account(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_accounts_ordered_by_id() {
        let repo = MemoryAccountRepository::new();
        for n in 0..5 {
            repo.create_account(&new_account(&format!("user{n}@example.com")))
                .await
                .unwrap();
        }

        let accounts = repo.list_accounts().await.unwrap();
        let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    fn new_customer(name: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            mobile: "5550142".to_string(),
            email: None,
            address: "12 Harbor Rd".to_string(),
            category_id: None,
            cooling_type_id: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_customer_crud() {
        let repo = MemoryCustomerRepository::new();

        let created = repo.create_customer(&new_customer("Meridian")).await.unwrap();
        assert_eq!(created.id, 1);

        let mut customer = repo.find_customer(created.id).await.unwrap().unwrap();
        customer.notes = Some("night shift".to_string());
        repo.update_customer(&customer).await.unwrap();

        let reloaded = repo.find_customer(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.notes.as_deref(), Some("night shift"));

        assert!(repo.delete_customer(created.id).await.unwrap());
        assert!(repo.find_customer(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_tables_are_independent() {
        let repo = MemoryCustomerRepository::new();

        let category = repo
            .add_lookup(LookupKind::Category, "Restaurant")
            .await
            .unwrap();
        let cooling = repo
            .add_lookup(LookupKind::CoolingType, "Walk-in")
            .await
            .unwrap();

        // Separate tables keep separate counters, like separate sequences.
        assert_eq!(category.id, 1);
        assert_eq!(cooling.id, 1);

        assert!(repo.lookup_exists(LookupKind::Category, category.id).await.unwrap());
        assert!(!repo.lookup_exists(LookupKind::Category, 99).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_lookups_sorted_by_name() {
        let repo = MemoryCustomerRepository::new();
        repo.add_lookup(LookupKind::Category, "Warehouse").await.unwrap();
        repo.add_lookup(LookupKind::Category, "Bakery").await.unwrap();
        repo.add_lookup(LookupKind::Category, "Restaurant").await.unwrap();

        let names: Vec<String> = repo
            .list_lookups(LookupKind::Category)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["Bakery", "Restaurant", "Warehouse"]);
    }

    #[tokio::test]
    async fn test_lookup_in_use_tracks_references() {
        let repo = MemoryCustomerRepository::new();
        let category = repo
            .add_lookup(LookupKind::Category, "Restaurant")
            .await
            .unwrap();

        let mut customer = new_customer("Meridian");
        customer.category_id = Some(category.id);
        repo.create_customer(&customer).await.unwrap();

        assert!(repo.lookup_in_use(LookupKind::Category, category.id).await.unwrap());
        assert!(!repo.lookup_in_use(LookupKind::CoolingType, category.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_about_content_upsert() {
        let repo = MemoryCustomerRepository::new();
        assert!(repo.get_about().await.unwrap().is_none());

        let about = AboutContent {
            title: "About Us".to_string(),
            body: "Cooling since 1998".to_string(),
            updated_at: Utc::now(),
        };
        repo.set_about(&about).await.unwrap();

        let stored = repo.get_about().await.unwrap().unwrap();
        assert_eq!(stored.title, "About Us");
        assert_eq!(stored.body, "Cooling since 1998");
    }
}
