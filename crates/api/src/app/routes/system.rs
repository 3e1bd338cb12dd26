use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::{SharedLedger, errors};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn summary(Extension(ledger): Extension<SharedLedger>) -> axum::response::Response {
    match ledger.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
