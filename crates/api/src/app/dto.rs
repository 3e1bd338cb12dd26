use serde::Deserialize;

use stockledger_core::{DomainError, Money};
use stockledger_inventory::MovementKind;
use stockledger_products::ProductDraft;

// -------------------------
// Request DTOs
// -------------------------

/// A monetary amount as sent by clients: integer cents (`500`) or a decimal string (`"5.00"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Cents(i64),
    Decimal(String),
}

impl AmountInput {
    pub fn to_money(&self) -> Result<Money, DomainError> {
        match self {
            AmountInput::Cents(cents) => Ok(Money::from_cents(*cents)),
            AmountInput::Decimal(raw) => raw.parse(),
        }
    }
}

/// Body of `POST /products` and `PUT /products/:id`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub stock: i64,
    pub price: AmountInput,
    pub cost: AmountInput,
}

impl TryFrom<ProductRequest> for ProductDraft {
    type Error = DomainError;

    fn try_from(body: ProductRequest) -> Result<Self, Self::Error> {
        let price = body.price.to_money()?;
        let cost = body.cost.to_money()?;
        Ok(ProductDraft::new(body.name, body.stock, price, cost))
    }
}

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    /// `"entrada"` or `"salida"`.
    pub kind: MovementKind,
    pub quantity: i64,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> ProductRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn amounts_accept_cents_or_decimal_strings() {
        let body = request(serde_json::json!({"name": "Widget", "stock": 10, "price": "5.00", "cost": 300}));
        let draft = ProductDraft::try_from(body).unwrap();

        assert_eq!(draft.price, Money::from_cents(500));
        assert_eq!(draft.cost, Money::from_cents(300));
    }

    #[test]
    fn malformed_decimal_is_an_amount_error() {
        let body = request(serde_json::json!({"name": "Widget", "stock": 1, "price": "5.123", "cost": "1"}));
        assert!(matches!(ProductDraft::try_from(body), Err(DomainError::InvalidAmount(_))));
    }
}
