//! Black-box tests: both services on ephemeral ports, in-memory stores, real
//! HTTP between the inventory service and the products service.

use reqwest::StatusCode;
use serde_json::json;

use storefront_infra::{InventoryConfig, ProductsConfig};

const API_KEY: &str = "test-key";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn spawn_products() -> TestServer {
    let config = ProductsConfig {
        port: 0,
        database_url: None,
        api_key: API_KEY.to_string(),
    };
    let app = storefront_api::app::build_products_app(&config).await.unwrap();
    TestServer::spawn(app).await
}

async fn spawn_inventory(products_base_url: &str) -> TestServer {
    let config = InventoryConfig {
        port: 0,
        database_url: None,
        api_key: API_KEY.to_string(),
        products_base_url: products_base_url.to_string(),
    };
    let app = storefront_api::app::build_inventory_app(&config).await.unwrap();
    TestServer::spawn(app).await
}

fn product_body(name: &str, sku: &str) -> serde_json::Value {
    json!({
        "data": {
            "type": "products",
            "attributes": {
                "name": name,
                "description": "black-box test product",
                "priceCents": 1999,
                "sku": sku,
            },
        },
    })
}

fn quantity_body(quantity: i64) -> serde_json::Value {
    json!({
        "data": { "type": "inventory", "attributes": { "quantity": quantity } },
    })
}

async fn create_product(client: &reqwest::Client, base_url: &str, sku: &str) -> String {
    let res = client
        .post(format!("{base_url}/api/v1/products"))
        .header("X-API-Key", API_KEY)
        .json(&product_body("Widget", sku))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_open_but_api_requires_key() {
    let products = spawn_products().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", products.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/v1/products", products.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/v1/products", products.base_url))
        .header("X-API-Key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_crud_lifecycle() {
    let products = spawn_products().await;
    let client = reqwest::Client::new();
    let base = &products.base_url;

    let id = create_product(&client, base, "WID-001").await;

    // Duplicate SKU conflicts.
    let res = client
        .post(format!("{base}/api/v1/products"))
        .header("X-API-Key", API_KEY)
        .json(&product_body("Widget Again", "WID-001"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Read it back.
    let res = client
        .get(format!("{base}/api/v1/products/{id}"))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["attributes"]["sku"], "WID-001");
    assert_eq!(
        body["data"]["links"]["self"],
        format!("/api/v1/products/{id}")
    );

    // Patch the price.
    let res = client
        .patch(format!("{base}/api/v1/products/{id}"))
        .header("X-API-Key", API_KEY)
        .json(&json!({
            "data": { "type": "products", "attributes": { "priceCents": 2499 } },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["attributes"]["priceCents"], 2499);

    // Delete, then 404.
    let res = client
        .delete(format!("{base}/api/v1/products/{id}"))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{base}/api/v1/products/{id}"))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_listing_paginates() {
    let products = spawn_products().await;
    let client = reqwest::Client::new();
    let base = &products.base_url;

    for i in 0..3 {
        create_product(&client, base, &format!("WID-{i:03}")).await;
    }

    let res = client
        .get(format!("{base}/api/v1/products?page[number]=1&page[size]=2"))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["pageSize"], 2);
    assert_eq!(body["meta"]["totalPages"], 2);
    assert_eq!(
        body["links"]["next"],
        "/api/v1/products?page[number]=2&page[size]=2"
    );
}

#[tokio::test]
async fn stock_lifecycle_for_existing_product() {
    let products = spawn_products().await;
    let inventory = spawn_inventory(&products.base_url).await;
    let client = reqwest::Client::new();

    let id = create_product(&client, &products.base_url, "WID-E2E").await;

    // First mutation creates the record.
    let res = client
        .patch(format!("{}/api/v1/inventory/{id}", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .json(&quantity_body(10))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["attributes"]["quantity"], 10);
    assert_eq!(body["data"]["attributes"]["productId"], id);
    assert_eq!(
        body["data"]["attributes"]["createdAt"],
        body["data"]["attributes"]["updatedAt"]
    );

    // Second mutation replaces the quantity in place.
    let res = client
        .patch(format!("{}/api/v1/inventory/{id}", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .json(&quantity_body(7))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["attributes"]["quantity"], 7);

    let res = client
        .get(format!("{}/api/v1/inventory/{id}", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["attributes"]["quantity"], 7);
}

#[tokio::test]
async fn stock_update_for_unknown_product_is_404() {
    let products = spawn_products().await;
    let inventory = spawn_inventory(&products.base_url).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/api/v1/inventory/prod-missing", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .json(&quantity_body(10))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"][0]["status"], "404");
}

#[tokio::test]
async fn stock_read_without_record_is_404() {
    let products = spawn_products().await;
    let inventory = spawn_inventory(&products.base_url).await;
    let client = reqwest::Client::new();

    let id = create_product(&client, &products.base_url, "WID-EMPTY").await;

    let res = client
        .get(format!("{}/api/v1/inventory/{id}", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["errors"][0]["detail"]
        .as_str()
        .unwrap()
        .starts_with("Inventory"));
}

#[tokio::test]
async fn negative_quantity_is_unprocessable() {
    let products = spawn_products().await;
    let inventory = spawn_inventory(&products.base_url).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/api/v1/inventory/whatever", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .json(&quantity_body(-1))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn wrong_resource_type_is_unprocessable() {
    let products = spawn_products().await;
    let inventory = spawn_inventory(&products.base_url).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/api/v1/inventory/whatever", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .json(&json!({
            "data": { "type": "products", "attributes": { "quantity": 5 } },
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn products_service_down_surfaces_503() {
    // Reserve a port, then drop the listener so nothing answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let inventory = spawn_inventory(&dead_url).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/api/v1/inventory/prod-1", inventory.base_url))
        .header("X-API-Key", API_KEY)
        .json(&quantity_body(10))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
