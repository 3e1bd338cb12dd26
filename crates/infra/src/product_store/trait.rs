use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockledger_core::ProductId;
use stockledger_inventory::Movement;
use stockledger_products::{Product, ValidatedProduct};

/// Store operation error.
///
/// These are **infrastructure errors** (missing rows, backend constraints, connectivity)
/// as opposed to the ledger's business rule errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("product {id} not found")]
    NotFound { id: ProductId },

    /// A backend constraint rejected the write (e.g. the unique name index).
    #[error("{operation} conflict: {message}")]
    Conflict { operation: &'static str, message: String },

    /// The backend could not be reached or failed while serving the request.
    #[error("{operation} failed: {message}")]
    Unavailable { operation: &'static str, message: String },
}

impl StoreError {
    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            operation,
            message: message.into(),
        }
    }

    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            operation,
            message: message.into(),
        }
    }
}

/// Field changes accepted by [`ProductStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductUpdate {
    /// Replace every editable field (an edit).
    Replace(ValidatedProduct),
    /// Set the stock level only (an adjustment).
    ///
    /// Applied only while the stored level still equals `expected`; otherwise the store
    /// reports [`StoreError::Conflict`] and leaves the row untouched.
    Stock { expected: i64, new: i64 },
}

/// Notification published by stores after a successful write.
///
/// Presentation code subscribes to these to know when to re-read; the ledger does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductChange {
    Created(Product),
    Updated(Product),
    Deleted { id: ProductId, occurred_at: DateTime<Utc> },
}

impl ProductChange {
    pub fn product_id(&self) -> ProductId {
        match self {
            ProductChange::Created(p) | ProductChange::Updated(p) => p.id,
            ProductChange::Deleted { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProductChange::Created(_) => "created",
            ProductChange::Updated(_) => "updated",
            ProductChange::Deleted { .. } => "deleted",
        }
    }
}

/// Persistence collaborator behind the inventory ledger.
///
/// Implementations assign `id` and `updated_at`, and report failures instead of
/// swallowing them. Reads are never cached by the ledger, so every call here should
/// reflect the backend's current state.
pub trait ProductStore: Send + Sync {
    /// All live products, in no particular order.
    fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// A single product by id.
    fn get(&self, id: ProductId) -> Result<Product, StoreError>;

    fn create(&self, fields: &ValidatedProduct) -> Result<Product, StoreError>;

    fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, StoreError>;

    fn delete(&self, id: ProductId) -> Result<(), StoreError>;

    /// Append a movement to the audit trail. Stores without history accept and drop it.
    fn append_movement(&self, _movement: &Movement) -> Result<(), StoreError> {
        Ok(())
    }

    /// Movements for one product, oldest first.
    fn movements(&self, _product_id: ProductId) -> Result<Vec<Movement>, StoreError> {
        Ok(Vec::new())
    }
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        (**self).get(id)
    }

    fn create(&self, fields: &ValidatedProduct) -> Result<Product, StoreError> {
        (**self).create(fields)
    }

    fn update(&self, id: ProductId, update: ProductUpdate) -> Result<Product, StoreError> {
        (**self).update(id, update)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn append_movement(&self, movement: &Movement) -> Result<(), StoreError> {
        (**self).append_movement(movement)
    }

    fn movements(&self, product_id: ProductId) -> Result<Vec<Movement>, StoreError> {
        (**self).movements(product_id)
    }
}
