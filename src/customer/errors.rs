//! Customer record error types.

use thiserror::Error;

use crate::account::Role;
use crate::customer::models::{LookupId, LookupKind};
use crate::db::StoreError;

/// Customer record errors
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// No customer matches the given identifier
    #[error("Customer not found")]
    NotFound,

    /// The acting account's role does not permit this operation
    #[error("Operation requires {required} role")]
    Forbidden { required: Role },

    /// The acting account was deleted while its token was still live
    #[error("Acting account no longer exists")]
    ActorMissing,

    /// The acting account holds no grant for a field it tried to change
    #[error("No permission for field: {0}")]
    FieldNotPermitted(String),

    /// A referenced lookup entry does not exist
    #[error("No {} with ID {id}", kind.as_str())]
    UnknownLookup { kind: LookupKind, id: LookupId },

    /// The lookup entry is still referenced by customer records
    #[error("Cannot remove {} {id}: still in use", kind.as_str())]
    LookupInUse { kind: LookupKind, id: LookupId },

    /// A required name was empty
    #[error("Name cannot be empty")]
    EmptyName,
}

impl CustomerError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            CustomerError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for customer record operations
pub type CustomerResult<T> = Result<T, CustomerError>;
