//! Router construction for the two service binaries.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use storefront_infra::{InventoryConfig, ProductsConfig};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::{InventoryServices, ProductsServices};

/// Build the products-service router from environment-derived config.
pub async fn build_products_app(config: &ProductsConfig) -> anyhow::Result<Router> {
    let services = Arc::new(ProductsServices::from_config(config).await?);
    Ok(products_router(services, &config.api_key))
}

/// Build the inventory-service router from environment-derived config.
pub async fn build_inventory_app(config: &InventoryConfig) -> anyhow::Result<Router> {
    let services = Arc::new(InventoryServices::from_config(config).await?);
    Ok(inventory_router(services, &config.api_key))
}

/// Assemble the products router around pre-built services.
pub fn products_router(services: Arc<ProductsServices>, api_key: &str) -> Router {
    let auth = middleware::AuthState::new(api_key);

    // Protected routes: everything under /api/v1 requires the shared key.
    let protected = Router::new()
        .nest("/api/v1/products", routes::products::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    middleware::api_key_middleware,
                ))
                .layer(Extension(services)),
        );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}

/// Assemble the inventory router around pre-built services.
pub fn inventory_router(services: Arc<InventoryServices>, api_key: &str) -> Router {
    let auth = middleware::AuthState::new(api_key);

    let protected = Router::new()
        .nest("/api/v1/inventory", routes::inventory::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    middleware::api_key_middleware,
                ))
                .layer(Extension(services)),
        );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
