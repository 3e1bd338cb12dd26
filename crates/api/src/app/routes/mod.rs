use axum::{Router, routing::get};

pub mod movements;
pub mod products;
pub mod system;

/// Router for the catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/summary", get(system::summary))
        .nest("/products", products::router().merge(movements::router()))
}
