use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{Entity, Money, ProductId};

/// A stock-keeping record as held by the product store.
///
/// `id` and `updated_at` are owned by the store; the ledger never invents them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Units on hand. Never negative once persisted.
    pub stock: i64,
    /// Sale price per unit.
    pub price: Money,
    /// Cost per unit.
    pub cost: Money,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a stored record from validated fields (used by store adapters).
    pub fn from_validated(id: ProductId, fields: &ValidatedProduct, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name.clone(),
            stock: fields.stock,
            price: fields.price,
            cost: fields.cost,
            updated_at,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Untrusted candidate fields for a create or an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub stock: i64,
    pub price: Money,
    pub cost: Money,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, stock: i64, price: Money, cost: Money) -> Self {
        Self {
            name: name.into(),
            stock,
            price,
            cost,
        }
    }
}

/// Product fields that passed validation (name trimmed).
///
/// Only the validator can build one, so a store write can never carry unchecked input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedProduct {
    name: String,
    stock: i64,
    price: Money,
    cost: Money,
}

impl ValidatedProduct {
    pub(crate) fn from_checked(draft: &ProductDraft, trimmed_name: &str) -> Self {
        Self {
            name: trimmed_name.to_string(),
            stock: draft.stock,
            price: draft.price,
            cost: draft.cost,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn cost(&self) -> Money {
        self.cost
    }
}
