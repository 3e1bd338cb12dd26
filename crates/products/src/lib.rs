//! Products domain module.
//!
//! This crate contains the catalog rules: what a product is, which drafts are
//! admissible, and the derived metrics shown next to each row. Everything here is
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod metrics;
pub mod product;
pub mod validation;

pub use metrics::{InventorySummary, ProductMetrics, ProductView, product_metrics, summarize};
pub use product::{Product, ProductDraft, ValidatedProduct};
pub use validation::{
    MAX_AMOUNT, MAX_STOCK, MarginRule, PriceRule, ValidationError, ValidationPolicy, validate_new, validate_rename,
};
