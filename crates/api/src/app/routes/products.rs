use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use storefront_core::{PageLinks, PageMeta, PageParams};
use storefront_products::{NewProduct, ProductPatch};

use crate::app::services::ProductsServices;
use crate::app::{dto, errors};

const COLLECTION_PATH: &str = "/api/v1/products";

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

// An unparseable id cannot name a row; callers see the same 404 as for an
// unknown one.
fn parse_id(id: &str) -> Result<Uuid, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(
            StatusCode::NOT_FOUND,
            "Not Found",
            format!("Product with id '{id}' not found"),
        )
    })
}

pub async fn create_product(
    Extension(services): Extension<Arc<ProductsServices>>,
    Json(body): Json<dto::Document<dto::CreateProductAttributes>>,
) -> axum::response::Response {
    let attrs = match body.attributes_of("products") {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };

    let input = NewProduct {
        name: attrs.name,
        description: attrs.description,
        price_cents: attrs.price_cents,
        sku: attrs.sku,
    };

    match services.products.create(input).await {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Err(err) => errors::product_error_to_response(err),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<ProductsServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.products.find_by_id(id).await {
        Ok(product) => Json(dto::product_to_json(&product)).into_response(),
        Err(err) => errors::product_error_to_response(err),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<ProductsServices>>,
    Query(query): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let params = PageParams::from_query(&query);

    match services.products.list(params).await {
        Ok((products, total)) => {
            let meta = PageMeta::new(total, params);
            let links = PageLinks::new(COLLECTION_PATH, &meta);
            Json(dto::products_to_json(&products, &meta, &links)).into_response()
        }
        Err(err) => errors::product_error_to_response(err),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<ProductsServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::Document<dto::UpdateProductAttributes>>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let attrs = match body.attributes_of("products") {
        Ok(attrs) => attrs,
        Err(response) => return response,
    };

    let patch = ProductPatch {
        name: attrs.name,
        description: attrs.description,
        price_cents: attrs.price_cents,
        sku: attrs.sku,
    };

    match services.products.update(id, patch).await {
        Ok(product) => Json(dto::product_to_json(&product)).into_response(),
        Err(err) => errors::product_error_to_response(err),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<ProductsServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.products.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::product_error_to_response(err),
    }
}
