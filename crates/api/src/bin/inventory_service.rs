use storefront_infra::InventoryConfig;

#[tokio::main]
async fn main() {
    storefront_observability::init("inventory-service");

    let config = InventoryConfig::from_env().expect("invalid environment");

    let app = storefront_api::app::build_inventory_app(&config)
        .await
        .expect("failed to build inventory service");

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind port {}: {e}", config.port));

    tracing::info!("inventory service listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
