use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockledger_core::{MovementId, ProductId};
use stockledger_products::{MAX_STOCK, Product};

use crate::movement::{Movement, MovementKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdjustError {
    #[error("quantity must be positive (got {0})")]
    InvalidQuantity(i64),

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("stock ceiling {ceiling} exceeded (would reach {resulting})")]
    CeilingExceeded { ceiling: i64, resulting: i64 },
}

/// Result of a successful adjustment: the new stock level plus the movement to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub movement: Movement,
}

/// Applies inbound/outbound quantities to a product's stock.
///
/// Pure decision logic: it reads the product it is given and returns the outcome. The
/// caller is responsible for handing it a fresh read and persisting the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockAdjuster {
    ceiling: Option<i64>,
}

impl StockAdjuster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inbound movements that would push stock above `ceiling`.
    pub fn with_ceiling(ceiling: i64) -> Self {
        Self { ceiling: Some(ceiling) }
    }

    pub fn ceiling(&self) -> Option<i64> {
        self.ceiling
    }

    pub fn adjust(
        &self,
        product: &Product,
        kind: MovementKind,
        quantity: i64,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Result<StockAdjustment, AdjustError> {
        if quantity <= 0 {
            return Err(AdjustError::InvalidQuantity(quantity));
        }

        let available = product.stock;
        let new_stock = match kind {
            MovementKind::Inbound => {
                let resulting = available.saturating_add(quantity);
                let ceiling = self.ceiling.map_or(MAX_STOCK, |c| c.min(MAX_STOCK));
                if resulting > ceiling {
                    return Err(AdjustError::CeilingExceeded { ceiling, resulting });
                }
                resulting
            }
            MovementKind::Outbound => {
                if quantity > available {
                    return Err(AdjustError::InsufficientStock {
                        requested: quantity,
                        available,
                    });
                }
                available - quantity
            }
        };

        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(StockAdjustment {
            product_id: product.id,
            previous_stock: available,
            new_stock,
            movement: Movement {
                id: MovementId::new(),
                product_id: product.id,
                kind,
                quantity,
                note,
                occurred_at,
            },
        })
    }
}
