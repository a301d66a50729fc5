//! Customer record data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::FieldPermissions;

/// Customer ID type
pub type CustomerId = i64;

/// Lookup entry ID type (categories and cooling types)
pub type LookupId = i64;

/// Field names used for per-account customer record grants.
pub mod fields {
    pub const NAME: &str = "name";
    pub const MOBILE: &str = "mobile";
    pub const EMAIL: &str = "email";
    pub const ADDRESS: &str = "address";
    pub const CATEGORY: &str = "category";
    pub const COOLING_TYPE: &str = "cooling_type";
    pub const NOTES: &str = "notes";

    /// Every grantable field, in display order.
    pub const ALL: [&str; 7] = [NAME, MOBILE, EMAIL, ADDRESS, CATEGORY, COOLING_TYPE, NOTES];
}

/// Customer record as stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: String,
    pub category_id: Option<LookupId>,
    pub cooling_type_id: Option<LookupId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a customer record
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: String,
    pub category_id: Option<LookupId>,
    pub cooling_type_id: Option<LookupId>,
    pub notes: Option<String>,
}

/// Partial update of a customer record.
///
/// `None` fields are left unchanged. Optional record fields cannot be cleared
/// through a patch; clients resubmit the full value instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub category_id: Option<LookupId>,
    pub cooling_type_id: Option<LookupId>,
    pub notes: Option<String>,
}

impl CustomerPatch {
    /// Names of the fields this patch touches.
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut touched = Vec::new();
        if self.name.is_some() {
            touched.push(fields::NAME);
        }
        if self.mobile.is_some() {
            touched.push(fields::MOBILE);
        }
        if self.email.is_some() {
            touched.push(fields::EMAIL);
        }
        if self.address.is_some() {
            touched.push(fields::ADDRESS);
        }
        if self.category_id.is_some() {
            touched.push(fields::CATEGORY);
        }
        if self.cooling_type_id.is_some() {
            touched.push(fields::COOLING_TYPE);
        }
        if self.notes.is_some() {
            touched.push(fields::NOTES);
        }
        touched
    }

    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty()
    }
}

/// Customer record as presented to a caller.
///
/// Fields the caller has not been granted are blanked out rather than omitted,
/// so every view has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub category_id: Option<LookupId>,
    pub cooling_type_id: Option<LookupId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CustomerView {
    /// Project a record through a set of field grants.
    ///
    /// `grants = None` means unrestricted access (administrative callers).
    pub fn project(customer: &Customer, grants: Option<&FieldPermissions>) -> Self {
        let allowed =
            |field: &str| grants.is_none_or(|g| g.get(field).copied().unwrap_or(false));

        CustomerView {
            id: customer.id,
            name: allowed(fields::NAME).then(|| customer.name.clone()),
            mobile: allowed(fields::MOBILE).then(|| customer.mobile.clone()),
            email: if allowed(fields::EMAIL) {
                customer.email.clone()
            } else {
                None
            },
            address: allowed(fields::ADDRESS).then(|| customer.address.clone()),
            category_id: if allowed(fields::CATEGORY) {
                customer.category_id
            } else {
                None
            },
            cooling_type_id: if allowed(fields::COOLING_TYPE) {
                customer.cooling_type_id
            } else {
                None
            },
            notes: if allowed(fields::NOTES) {
                customer.notes.clone()
            } else {
                None
            },
            created_at: customer.created_at,
        }
    }
}

/// Kind of lookup table a lookup entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Category,
    CoolingType,
}

impl LookupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupKind::Category => "category",
            LookupKind::CoolingType => "cooling type",
        }
    }
}

/// Named entry in a lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: LookupId,
    pub name: String,
}

/// Editable about-page content, a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}
