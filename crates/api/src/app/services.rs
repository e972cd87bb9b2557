//! Service wiring from config.
//!
//! `DATABASE_URL` decides persistence at startup: present means Postgres via
//! a sqlx pool, absent means the in-memory stores (dev/test wiring). The
//! routers only see the ports, never the concrete adapters.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use storefront_events::{EventSink, TracingEventSink};
use storefront_infra::{
    HttpClientConfig, HttpProductGateway, InMemoryInventoryStore, InMemoryProductRepository,
    InventoryConfig, PostgresInventoryStore, PostgresProductRepository, ProductsConfig,
    RetryingHttpClient,
};
use storefront_inventory::{
    InventoryChangeEvent, InventoryService, InventoryStore, ProductGateway,
};
use storefront_products::{ProductRepository, ProductService};

/// Everything the products router needs.
pub struct ProductsServices {
    pub products: ProductService<Arc<dyn ProductRepository>>,
}

impl ProductsServices {
    pub async fn from_config(config: &ProductsConfig) -> anyhow::Result<Self> {
        let repository: Arc<dyn ProductRepository> = match &config.database_url {
            Some(url) => {
                let pool = PgPool::connect(url).await?;
                info!("connected to database");
                Arc::new(PostgresProductRepository::new(pool))
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory product store");
                Arc::new(InMemoryProductRepository::new())
            }
        };

        Ok(Self {
            products: ProductService::new(repository),
        })
    }
}

type AppInventoryService = InventoryService<
    Arc<dyn ProductGateway>,
    Arc<dyn InventoryStore>,
    Arc<dyn EventSink<InventoryChangeEvent>>,
>;

/// Everything the inventory router needs.
pub struct InventoryServices {
    pub inventory: AppInventoryService,
}

impl InventoryServices {
    pub async fn from_config(config: &InventoryConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn InventoryStore> = match &config.database_url {
            Some(url) => {
                let pool = PgPool::connect(url).await?;
                info!("connected to database");
                Arc::new(PostgresInventoryStore::new(pool))
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory inventory store");
                Arc::new(InMemoryInventoryStore::new())
            }
        };

        let client = RetryingHttpClient::new(
            HttpClientConfig::new(config.products_base_url.clone())
                .with_api_key(config.api_key.clone()),
        )?;
        let gateway: Arc<dyn ProductGateway> = Arc::new(HttpProductGateway::new(client));

        let sink: Arc<dyn EventSink<InventoryChangeEvent>> = Arc::new(TracingEventSink::new());

        Ok(Self {
            inventory: InventoryService::new(gateway, store, sink),
        })
    }
}
