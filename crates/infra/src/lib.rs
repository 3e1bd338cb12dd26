//! Infrastructure layer: product stores, the ledger service and configuration.

pub mod config;
pub mod ledger;
pub mod product_store;

pub use config::{ConfigError, LedgerConfig, Settings};
pub use ledger::{InventoryLedger, LedgerError, StockAdjusted};
pub use product_store::{
    InMemoryProductStore, PostgresProductStore, ProductChange, ProductStore, ProductUpdate, StoreError,
};
