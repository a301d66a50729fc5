//! Database schema creation.
//!
//! Tables are created in dependency order with `IF NOT EXISTS`, so calling
//! [`init`] on an already-initialized database is a no-op. There is no
//! migration machinery; schema changes ship as new statements here.

use sqlx::PgPool;

/// Table definitions, in creation order.
const TABLES: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS accounts (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        mobile TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user'
            CHECK (role IN ('user', 'admin', 'superadmin')),
        is_verified BOOLEAN NOT NULL DEFAULT FALSE,
        otp_code TEXT,
        otp_expires_at TIMESTAMPTZ,
        permissions TEXT NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK ((otp_code IS NULL) = (otp_expires_at IS NULL))
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS cooling_types (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS customers (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        mobile TEXT NOT NULL,
        email TEXT,
        address TEXT NOT NULL,
        category_id BIGINT REFERENCES categories(id),
        cooling_type_id BIGINT REFERENCES cooling_types(id),
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    // Single-row table; the boolean key pins every write to the same row.
    "CREATE TABLE IF NOT EXISTS about_content (
        id BOOLEAN PRIMARY KEY DEFAULT TRUE CHECK (id),
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

/// Create any missing tables.
///
/// # Arguments
///
/// * `pool` - Database connection pool
///
/// # Returns
///
/// * `Result<(), sqlx::Error>` - Ok once every table exists
pub async fn init(pool: &PgPool) -> Result<(), sqlx::Error> {
    for table in TABLES {
        sqlx::query(table).execute(pool).await?;
    }

    log::info!("Database schema initialized");
    Ok(())
}
