use storefront_infra::ProductsConfig;

#[tokio::main]
async fn main() {
    storefront_observability::init("products-service");

    let config = ProductsConfig::from_env().expect("invalid environment");

    let app = storefront_api::app::build_products_app(&config)
        .await
        .expect("failed to build products service");

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind port {}: {e}", config.port));

    tracing::info!("products service listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
