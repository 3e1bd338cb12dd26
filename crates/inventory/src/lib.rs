//! Inventory domain module.
//!
//! Stock adjustments (inbound/outbound) and the movement audit trail, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod adjuster;
pub mod movement;

pub use adjuster::{AdjustError, StockAdjuster, StockAdjustment};
pub use movement::{Movement, MovementKind};
