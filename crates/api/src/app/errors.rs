use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_inventory::InventoryError;
use storefront_products::ProductError;

/// JSON:API-style error document: `{ "errors": [{ status, title, detail }] }`.
pub fn json_error(
    status: StatusCode,
    title: &'static str,
    detail: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "errors": [{
                "status": status.as_u16().to_string(),
                "title": title,
                "detail": detail.into(),
            }],
        })),
    )
        .into_response()
}

pub fn product_error_to_response(err: ProductError) -> axum::response::Response {
    match err {
        ProductError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Not Found", err.to_string()),
        ProductError::SkuConflict(_) => json_error(StatusCode::CONFLICT, "Conflict", err.to_string()),
        ProductError::Validation(_) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unprocessable Entity",
            err.to_string(),
        ),
        ProductError::Storage(err) => internal_error(&err),
    }
}

pub fn inventory_error_to_response(err: InventoryError) -> axum::response::Response {
    match err {
        InventoryError::NotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "Not Found", err.to_string())
        }
        InventoryError::GatewayTimeout(_) => {
            json_error(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout", err.to_string())
        }
        InventoryError::ServiceUnavailable(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            err.to_string(),
        ),
        InventoryError::InvalidQuantity(_) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unprocessable Entity",
            "Quantity must be non-negative",
        ),
        InventoryError::Storage(err) => internal_error(&err),
    }
}

fn internal_error(err: &dyn std::error::Error) -> axum::response::Response {
    tracing::error!(error = %err, "unhandled storage failure");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "An unexpected error occurred",
    )
}
