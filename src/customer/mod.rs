//! Customer record module: records, lookup tables, and about-page content.
//!
//! Customer records reference two admin-maintained lookup tables (categories
//! and cooling types) by ID. What a caller sees and may edit is decided per
//! field: admin roles are unrestricted, while `user` accounts go through the
//! grants a superadmin has set on their account. Views are projected rather
//! than filtered, so every caller gets the same record shape with ungranted
//! fields blanked.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{CustomerError, CustomerResult};
pub use manager::CustomerManager;
pub use models::{
    AboutContent, Customer, CustomerId, CustomerPatch, CustomerView, LookupEntry, LookupId,
    LookupKind, NewCustomer, fields,
};
