use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::{SharedLedger, dto, errors};

pub fn router() -> Router {
    Router::new().route("/:id/movements", get(list_movements).post(adjust_stock))
}

/// Apply an `entrada`/`salida` to a product's stock.
pub async fn adjust_stock(
    Extension(ledger): Extension<SharedLedger>,
    Path(id): Path<String>,
    Json(body): Json<dto::MovementRequest>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match ledger.adjust_stock(id, body.kind, body.quantity, body.note) {
        Ok(adjusted) => (StatusCode::CREATED, Json(adjusted)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_movements(
    Extension(ledger): Extension<SharedLedger>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match ledger.movement_history(id) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
