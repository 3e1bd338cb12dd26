use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{MovementId, ProductId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Units received (`entrada`).
    #[serde(rename = "entrada")]
    Inbound,
    /// Units sold or removed (`salida`).
    #[serde(rename = "salida")]
    Outbound,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Inbound => "entrada",
            MovementKind::Outbound => "salida",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entrada" => Some(MovementKind::Inbound),
            "salida" => Some(MovementKind::Outbound),
            _ => None,
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit trail entry for one stock adjustment.
///
/// Append-only: movements are never edited or removed, and are read back ordered by
/// `occurred_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub kind: MovementKind,
    /// Always positive; the direction is carried by `kind`.
    pub quantity: i64,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: MovementKind, quantity: i64) -> Movement {
        Movement {
            id: MovementId::new(),
            product_id: ProductId::new(),
            kind,
            quantity,
            note: None,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn kind_uses_ledger_vocabulary_on_the_wire() {
        assert_eq!(serde_json::to_string(&MovementKind::Inbound).unwrap(), "\"entrada\"");
        assert_eq!(serde_json::to_string(&MovementKind::Outbound).unwrap(), "\"salida\"");
        let parsed: MovementKind = serde_json::from_str("\"salida\"").unwrap();
        assert_eq!(parsed, MovementKind::Outbound);
    }

    #[test]
    fn parse_matches_display() {
        for kind in [MovementKind::Inbound, MovementKind::Outbound] {
            assert_eq!(MovementKind::parse(&kind.to_string()), Some(kind));
        }
        assert_eq!(MovementKind::parse("sideways"), None);
    }

    #[test]
    fn movement_json_carries_kind_and_note() {
        let mut m = movement(MovementKind::Outbound, 4);
        m.note = Some("sold at the counter".into());

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["kind"], "salida");
        assert_eq!(json["quantity"], 4);
        assert_eq!(json["note"], "sold at the counter");
    }
}
