//! Inventory ledger: the application service in front of a `ProductStore`.
//!
//! Every operation follows the same shape:
//!
//! ```text
//! fresh read from the store
//!   ↓
//! pure decision (validator / stock adjuster / metrics)
//!   ↓
//! single write through the store (only if the decision succeeded)
//! ```
//!
//! The ledger keeps no product cache between calls. Uniqueness and stock sufficiency are
//! always judged against a read taken immediately before the write. Edits resolve as
//! last-write-wins, with the store's own constraints as the final guard. Stock writes
//! are conditional on the level that was read: if another adjustment landed in between,
//! the store reports a conflict and nothing is written.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use stockledger_core::ProductId;
use stockledger_inventory::{AdjustError, Movement, MovementKind, StockAdjuster};
use stockledger_products::{
    InventorySummary, Product, ProductDraft, ProductView, ValidationError, ValidationPolicy, summarize,
    validate_new, validate_rename,
};

use crate::config::LedgerConfig;
use crate::product_store::{ProductStore, ProductUpdate, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Adjust(#[from] AdjustError),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { id } => LedgerError::NotFound(id),
            other => LedgerError::Store(other),
        }
    }
}

/// Outcome of a successful stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAdjusted {
    pub product: Product,
    pub previous_stock: i64,
    pub movement: Movement,
    /// Whether the movement was written to the audit trail.
    pub recorded: bool,
}

/// Application service exposing the catalog operations to a presentation layer.
#[derive(Debug)]
pub struct InventoryLedger<S> {
    store: S,
    policy: ValidationPolicy,
    adjuster: StockAdjuster,
    track_movements: bool,
}

impl<S> InventoryLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &LedgerConfig::default())
    }

    pub fn with_config(store: S, config: &LedgerConfig) -> Self {
        Self {
            store,
            policy: config.policy,
            adjuster: config.adjuster(),
            track_movements: config.track_movements,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> InventoryLedger<S>
where
    S: ProductStore,
{
    /// Validate a draft against the current catalog and create it.
    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    pub fn add_product(&self, draft: &ProductDraft) -> Result<Product, LedgerError> {
        let current = self.store.list()?;
        let validated = validate_new(draft, current.iter().map(|p| p.name.as_str()), &self.policy)?;

        let product = self.store.create(&validated)?;
        tracing::info!(product_id = %product.id, "product added");
        Ok(product)
    }

    /// Replace the editable fields of `id`. The product may keep its own name.
    #[instrument(skip(self, draft), fields(product_id = %id, name = %draft.name), err)]
    pub fn edit_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, LedgerError> {
        let current = self.store.list()?;
        if !current.iter().any(|p| p.id == id) {
            return Err(LedgerError::NotFound(id));
        }

        let validated = validate_rename(
            draft,
            id,
            current.iter().map(|p| (p.id, p.name.as_str())),
            &self.policy,
        )?;

        let product = self.store.update(id, ProductUpdate::Replace(validated))?;
        tracing::info!("product edited");
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub fn delete_product(&self, id: ProductId) -> Result<(), LedgerError> {
        self.store.delete(id)?;
        tracing::info!("product deleted");
        Ok(())
    }

    /// Apply an inbound/outbound quantity to `id` and record the movement.
    #[instrument(skip(self, note), fields(product_id = %id, kind = %kind), err)]
    pub fn adjust_stock(
        &self,
        id: ProductId,
        kind: MovementKind,
        quantity: i64,
        note: Option<String>,
    ) -> Result<StockAdjusted, LedgerError> {
        let product = self.store.get(id)?;
        let adjustment = self.adjuster.adjust(&product, kind, quantity, note, Utc::now())?;

        let update = ProductUpdate::Stock {
            expected: adjustment.previous_stock,
            new: adjustment.new_stock,
        };
        let updated = self.store.update(id, update)?;

        // The stock write already happened; a failed audit append is reported, not undone.
        let recorded = if self.track_movements {
            self.store.append_movement(&adjustment.movement)?;
            true
        } else {
            false
        };

        tracing::info!(
            previous_stock = adjustment.previous_stock,
            new_stock = updated.stock,
            recorded,
            "stock adjusted"
        );

        Ok(StockAdjusted {
            product: updated,
            previous_stock: adjustment.previous_stock,
            movement: adjustment.movement,
            recorded,
        })
    }

    /// Current catalog with derived metrics, sorted by name.
    #[instrument(skip(self), err)]
    pub fn list_with_metrics(&self) -> Result<Vec<ProductView>, LedgerError> {
        let mut products = self.store.list()?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products.into_iter().map(ProductView::from).collect())
    }

    #[instrument(skip(self), err)]
    pub fn summary(&self) -> Result<InventorySummary, LedgerError> {
        let products = self.store.list()?;
        Ok(summarize(&products))
    }

    /// Look a product up by exact (trimmed) name.
    #[instrument(skip(self), err)]
    pub fn find_by_name(&self, name: &str) -> Result<Option<ProductView>, LedgerError> {
        let name = name.trim();
        let found = self
            .store
            .list()?
            .into_iter()
            .find(|p| p.name == name)
            .map(ProductView::from);
        Ok(found)
    }

    /// Audit trail of `id`, oldest first. Movements outlive deleted products.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub fn movement_history(&self, id: ProductId) -> Result<Vec<Movement>, LedgerError> {
        Ok(self.store.movements(id)?)
    }
}
