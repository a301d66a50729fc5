//! Repository trait definitions for testability and dependency injection.
//!
//! This module provides trait-based abstractions over storage operations,
//! enabling better testing through in-memory implementations and dependency
//! injection. The PostgreSQL implementations live here; the in-memory ones
//! live in [`crate::db::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::account::{Account, AccountId, NewAccount, OtpChallenge};
use crate::customer::{
    AboutContent, Customer, CustomerId, LookupEntry, LookupId, LookupKind, NewCustomer,
};
use crate::db::errors::{StoreError, StoreResult};

/// Trait for account repository operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a new, unverified account with no field grants
    async fn create_account(&self, account: &NewAccount) -> StoreResult<AccountId>;

    /// Find account by email address
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: AccountId) -> StoreResult<Option<Account>>;

    /// Persist the full current state of an account
    async fn update_account(&self, account: &Account) -> StoreResult<()>;

    /// Delete an account; returns whether a row was removed
    async fn delete_account(&self, account_id: AccountId) -> StoreResult<bool>;

    /// List all accounts ordered by ID
    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;
}

/// Trait for customer record repository operations
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Create a customer record
    async fn create_customer(&self, customer: &NewCustomer) -> StoreResult<Customer>;

    /// Find customer by ID
    async fn find_customer(&self, customer_id: CustomerId) -> StoreResult<Option<Customer>>;

    /// List all customers ordered by ID
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    /// Persist the full current state of a customer record
    async fn update_customer(&self, customer: &Customer) -> StoreResult<()>;

    /// Delete a customer record; returns whether a row was removed
    async fn delete_customer(&self, customer_id: CustomerId) -> StoreResult<bool>;

    /// Add an entry to a lookup table
    async fn add_lookup(&self, kind: LookupKind, name: &str) -> StoreResult<LookupEntry>;

    /// List a lookup table's entries ordered by name
    async fn list_lookups(&self, kind: LookupKind) -> StoreResult<Vec<LookupEntry>>;

    /// Remove a lookup entry; returns whether a row was removed
    async fn remove_lookup(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool>;

    /// Whether a lookup entry exists
    async fn lookup_exists(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool>;

    /// Whether any customer record references a lookup entry
    async fn lookup_in_use(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool>;

    /// Fetch the about-page content, if it has been set
    async fn get_about(&self) -> StoreResult<Option<AboutContent>>;

    /// Replace the about-page content
    async fn set_about(&self, about: &AboutContent) -> StoreResult<()>;
}

/// Default PostgreSQL implementation of `AccountRepository`
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, name, email, mobile, password_hash, role, is_verified,
             otp_code, otp_expires_at, permissions, created_at";

fn account_from_row(row: &PgRow) -> StoreResult<Account> {
    let role = row
        .get::<String, _>("role")
        .parse()
        .map_err(|err: crate::account::UnknownRole| StoreError::Malformed(err.to_string()))?;

    let permissions = serde_json::from_str(&row.get::<String, _>("permissions"))
        .map_err(|err| StoreError::Malformed(format!("Bad permissions JSON: {err}")))?;

    // The schema constrains the code and expiry to be set together.
    let otp = match (
        row.get::<Option<String>, _>("otp_code"),
        row.get::<Option<DateTime<Utc>>, _>("otp_expires_at"),
    ) {
        (Some(code), Some(expires_at)) => Some(OtpChallenge { code, expires_at }),
        _ => None,
    };

    Ok(Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        mobile: row.get("mobile"),
        password_hash: row.get("password_hash"),
        role,
        is_verified: row.get("is_verified"),
        otp,
        permissions,
        created_at: row.get("created_at"),
    })
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create_account(&self, account: &NewAccount) -> StoreResult<AccountId> {
        let row = sqlx::query(
            "INSERT INTO accounts (name, email, mobile, password_hash)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.mobile)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row.get("id"))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_id(&self, account_id: AccountId) -> StoreResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn update_account(&self, account: &Account) -> StoreResult<()> {
        let permissions = serde_json::to_string(&account.permissions)
            .map_err(|err| StoreError::Malformed(format!("Bad permissions JSON: {err}")))?;

        sqlx::query(
            "UPDATE accounts
             SET name = $2, email = $3, mobile = $4, password_hash = $5, role = $6,
                 is_verified = $7, otp_code = $8, otp_expires_at = $9, permissions = $10
             WHERE id = $1",
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.mobile)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.is_verified)
        .bind(account.otp.as_ref().map(|c| c.code.clone()))
        .bind(account.otp.as_ref().map(|c| c.expires_at))
        .bind(permissions)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn delete_account(&self, account_id: AccountId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(account_from_row).collect()
    }
}

/// Default PostgreSQL implementation of `CustomerRepository`
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, mobile, email, address, category_id, cooling_type_id,
             notes, created_at, updated_at";

fn customer_from_row(row: &PgRow) -> Customer {
    Customer {
        id: row.get("id"),
        name: row.get("name"),
        mobile: row.get("mobile"),
        email: row.get("email"),
        address: row.get("address"),
        category_id: row.get("category_id"),
        cooling_type_id: row.get("cooling_type_id"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn lookup_table(kind: LookupKind) -> &'static str {
    match kind {
        LookupKind::Category => "categories",
        LookupKind::CoolingType => "cooling_types",
    }
}

fn lookup_column(kind: LookupKind) -> &'static str {
    match kind {
        LookupKind::Category => "category_id",
        LookupKind::CoolingType => "cooling_type_id",
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create_customer(&self, customer: &NewCustomer) -> StoreResult<Customer> {
        let row = sqlx::query(&format!(
            "INSERT INTO customers (name, mobile, email, address, category_id, cooling_type_id, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.category_id)
        .bind(customer.cooling_type_id)
        .bind(&customer.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer_from_row(&row))
    }

    async fn find_customer(&self, customer_id: CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(customer_from_row))
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(customer_from_row).collect())
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<()> {
        sqlx::query(
            "UPDATE customers
             SET name = $2, mobile = $3, email = $4, address = $5, category_id = $6,
                 cooling_type_id = $7, notes = $8, updated_at = $9
             WHERE id = $1",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.category_id)
        .bind(customer.cooling_type_id)
        .bind(&customer.notes)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_customer(&self, customer_id: CustomerId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_lookup(&self, kind: LookupKind, name: &str) -> StoreResult<LookupEntry> {
        let table = lookup_table(kind);
        let row = sqlx::query(&format!(
            "INSERT INTO {table} (name) VALUES ($1) RETURNING id"
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(LookupEntry {
            id: row.get("id"),
            name: name.to_string(),
        })
    }

    async fn list_lookups(&self, kind: LookupKind) -> StoreResult<Vec<LookupEntry>> {
        let table = lookup_table(kind);
        let rows = sqlx::query(&format!("SELECT id, name FROM {table} ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| LookupEntry {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn remove_lookup(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool> {
        let table = lookup_table(kind);
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn lookup_exists(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool> {
        let table = lookup_table(kind);
        let row = sqlx::query(&format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1) AS found"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("found"))
    }

    async fn lookup_in_use(&self, kind: LookupKind, id: LookupId) -> StoreResult<bool> {
        let column = lookup_column(kind);
        let row = sqlx::query(&format!(
            "SELECT EXISTS (SELECT 1 FROM customers WHERE {column} = $1) AS found"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("found"))
    }

    async fn get_about(&self) -> StoreResult<Option<AboutContent>> {
        let row = sqlx::query("SELECT title, body, updated_at FROM about_content")
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| AboutContent {
            title: r.get("title"),
            body: r.get("body"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn set_about(&self, about: &AboutContent) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO about_content (id, title, body, updated_at)
             VALUES (TRUE, $1, $2, $3)
             ON CONFLICT (id) DO UPDATE
             SET title = EXCLUDED.title, body = EXCLUDED.body, updated_at = EXCLUDED.updated_at",
        )
        .bind(&about.title)
        .bind(&about.body)
        .bind(about.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
