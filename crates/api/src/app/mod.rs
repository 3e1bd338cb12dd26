//! HTTP API application wiring (Axum router + ledger wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use stockledger_infra::{InventoryLedger, ProductStore};

pub mod dto;
pub mod errors;
pub mod routes;

/// The ledger as shared by every handler.
pub type SharedLedger = Arc<InventoryLedger<Arc<dyn ProductStore>>>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(ledger: InventoryLedger<Arc<dyn ProductStore>>) -> Router {
    let ledger: SharedLedger = Arc::new(ledger);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(ledger)))
}
