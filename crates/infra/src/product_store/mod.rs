//! Product store boundary.
//!
//! The ledger only sees the `ProductStore` trait. Adapters decide where rows live
//! (process memory, Postgres) and enforce whatever constraints their backend has.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductChange, ProductStore, ProductUpdate, StoreError};
