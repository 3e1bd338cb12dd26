//! Admission rules for new and edited products.
//!
//! Validation is a pure function of the draft, the names currently in the store and the
//! configured policy. Callers must pass names from a read taken right before the write.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockledger_core::{Money, ProductId};

use crate::product::{ProductDraft, ValidatedProduct};

/// Largest stock level a product may hold.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Largest unit price or cost (10,000,000.00).
///
/// With [`MAX_STOCK`] this keeps `stock * price` well inside `i64`, so per-product totals
/// are exact.
pub const MAX_AMOUNT: Money = Money::from_cents(1_000_000_000);

/// Lower bound on the sale price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRule {
    /// `price > 0` is required.
    #[default]
    Positive,
    /// `price >= 0` is enough (free items allowed).
    NonNegative,
}

/// Relationship required between sale price and unit cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginRule {
    /// Reject `price < cost`; selling at cost is allowed.
    #[default]
    AllowBreakEven,
    /// Reject `price <= cost`.
    RequireProfit,
}

/// Configurable validation thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub price: PriceRule,
    pub margin: MarginRule,
}

impl ValidationPolicy {
    fn price_is_valid(&self, price: Money) -> bool {
        match self.price {
            PriceRule::Positive => price > Money::zero(),
            PriceRule::NonNegative => !price.is_negative(),
        }
    }

    fn margin_is_valid(&self, price: Money, cost: Money) -> bool {
        match self.margin {
            MarginRule::AllowBreakEven => price >= cost,
            MarginRule::RequireProfit => price > cost,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name cannot be empty")]
    EmptyName,

    #[error("a product named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("invalid sale price {price}")]
    InvalidPrice { price: Money },

    #[error("cost cannot be negative (got {cost})")]
    NegativeCost { cost: Money },

    #[error("sale price {price} is below cost {cost}")]
    PriceBelowCost { price: Money, cost: Money },

    #[error("stock cannot be negative (got {stock})")]
    NegativeStock { stock: i64 },

    #[error("amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Money, max: Money },

    #[error("stock {stock} exceeds the maximum of {max}")]
    StockTooLarge { stock: i64, max: i64 },
}

/// Validate a draft for creation against the names of all current products.
pub fn validate_new<I, S>(
    draft: &ProductDraft,
    existing_names: I,
    policy: &ValidationPolicy,
) -> Result<ValidatedProduct, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let name = non_empty_name(draft)?;

    if existing_names.into_iter().any(|existing| existing.as_ref() == name) {
        return Err(ValidationError::DuplicateName { name: name.to_string() });
    }

    check_amounts(draft, policy)?;
    Ok(ValidatedProduct::from_checked(draft, name))
}

/// Validate a draft that edits `current_id`.
///
/// Same checks as [`validate_new`], except the product may keep its own name.
pub fn validate_rename<I, S>(
    draft: &ProductDraft,
    current_id: ProductId,
    existing: I,
    policy: &ValidationPolicy,
) -> Result<ValidatedProduct, ValidationError>
where
    I: IntoIterator<Item = (ProductId, S)>,
    S: AsRef<str>,
{
    let name = non_empty_name(draft)?;

    let taken = existing
        .into_iter()
        .any(|(id, existing)| id != current_id && existing.as_ref() == name);
    if taken {
        return Err(ValidationError::DuplicateName { name: name.to_string() });
    }

    check_amounts(draft, policy)?;
    Ok(ValidatedProduct::from_checked(draft, name))
}

fn non_empty_name(draft: &ProductDraft) -> Result<&str, ValidationError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name)
}

fn check_amounts(draft: &ProductDraft, policy: &ValidationPolicy) -> Result<(), ValidationError> {
    if !policy.price_is_valid(draft.price) {
        return Err(ValidationError::InvalidPrice { price: draft.price });
    }
    if draft.cost.is_negative() {
        return Err(ValidationError::NegativeCost { cost: draft.cost });
    }
    if let Some(amount) = [draft.price, draft.cost].into_iter().find(|a| *a > MAX_AMOUNT) {
        return Err(ValidationError::AmountTooLarge { amount, max: MAX_AMOUNT });
    }
    if !policy.margin_is_valid(draft.price, draft.cost) {
        return Err(ValidationError::PriceBelowCost {
            price: draft.price,
            cost: draft.cost,
        });
    }
    if draft.stock < 0 {
        return Err(ValidationError::NegativeStock { stock: draft.stock });
    }
    if draft.stock > MAX_STOCK {
        return Err(ValidationError::StockTooLarge {
            stock: draft.stock,
            max: MAX_STOCK,
        });
    }
    Ok(())
}
