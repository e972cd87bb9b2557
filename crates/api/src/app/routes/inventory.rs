use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::InventoryServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/:product_id", get(get_inventory).patch(update_stock))
}

pub async fn get_inventory(
    Extension(services): Extension<Arc<InventoryServices>>,
    Path(product_id): Path<String>,
) -> axum::response::Response {
    match services.inventory.get_by_product_id(&product_id).await {
        Ok(record) => Json(dto::inventory_to_json(&record)).into_response(),
        Err(err) => errors::inventory_error_to_response(err),
    }
}

pub async fn update_stock(
    Extension(services): Extension<Arc<InventoryServices>>,
    Path(product_id): Path<String>,
    Json(body): Json<dto::Document<dto::UpdateInventoryAttributes>>,
) -> axum::response::Response {
    let attrs = match body.attributes_of("inventory") {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };

    match services
        .inventory
        .update_stock(&product_id, attrs.quantity)
        .await
    {
        Ok(record) => Json(dto::inventory_to_json(&record)).into_response(),
        Err(err) => errors::inventory_error_to_response(err),
    }
}
