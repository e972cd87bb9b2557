//! Infrastructure layer: outbound HTTP, persistence adapters, config.

pub mod config;
pub mod db;
pub mod http;

pub use config::{ConfigError, InventoryConfig, ProductsConfig};
pub use db::in_memory::{InMemoryInventoryStore, InMemoryProductRepository};
pub use db::postgres::{PostgresInventoryStore, PostgresProductRepository};
pub use http::products_gateway::HttpProductGateway;
pub use http::transport::{
    ConnectionErrorKind, HttpClientConfig, RawResponse, RetryPolicy, RetryingHttpClient,
    TransportError,
};
