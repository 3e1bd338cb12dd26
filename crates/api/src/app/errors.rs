use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockledger_core::{DomainError, ProductId};
use stockledger_infra::{LedgerError, StoreError};
use stockledger_inventory::AdjustError;
use stockledger_products::ValidationError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::Validation(ValidationError::DuplicateName { .. }) => {
            json_error(StatusCode::CONFLICT, "duplicate_name", message)
        }
        LedgerError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        LedgerError::Adjust(AdjustError::InvalidQuantity(_)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", message)
        }
        LedgerError::Adjust(AdjustError::InsufficientStock { .. }) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", message)
        }
        LedgerError::Adjust(AdjustError::CeilingExceeded { .. }) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "ceiling_exceeded", message)
        }
        LedgerError::NotFound(_) | LedgerError::Store(StoreError::NotFound { .. }) => {
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        LedgerError::Store(StoreError::Conflict { .. }) => json_error(StatusCode::CONFLICT, "conflict", message),
        LedgerError::Store(StoreError::Unavailable { .. }) => {
            tracing::error!(error = %message, "product store unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidAmount(_) => json_error(StatusCode::BAD_REQUEST, "invalid_amount", err.to_string()),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}
