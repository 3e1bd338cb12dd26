use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};

use stockledger_products::{ProductDraft, ProductView};

use crate::app::{SharedLedger, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/by-name/:name", get(find_by_name))
        .route("/:id", put(edit_product).delete(delete_product))
}

pub async fn list_products(Extension(ledger): Extension<SharedLedger>) -> axum::response::Response {
    match ledger.list_with_metrics() {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(ledger): Extension<SharedLedger>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let draft = match ProductDraft::try_from(body) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match ledger.add_product(&draft) {
        Ok(product) => (StatusCode::CREATED, Json(ProductView::from(product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn find_by_name(
    Extension(ledger): Extension<SharedLedger>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match ledger.find_by_name(&name) {
        Ok(Some(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no product named '{}'", name.trim()),
        ),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn edit_product(
    Extension(ledger): Extension<SharedLedger>,
    Path(id): Path<String>,
    Json(body): Json<dto::ProductRequest>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let draft = match ProductDraft::try_from(body) {
        Ok(draft) => draft,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match ledger.edit_product(id, &draft) {
        Ok(product) => (StatusCode::OK, Json(ProductView::from(product))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(ledger): Extension<SharedLedger>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match ledger.delete_product(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
