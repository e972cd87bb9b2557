//! Inventory mutation workflow.

use thiserror::Error;

use storefront_core::StorageError;
use storefront_events::EventSink;

use crate::events::{change_event, InventoryChangeEvent};
use crate::gateway::{GatewayError, ProductGateway, ProductRef};
use crate::record::InventoryRecord;
use crate::store::InventoryStore;

const PRODUCTS_SERVICE: &str = "Products service";

/// Failures surfaced to the inventory API layer.
///
/// `NotFound`, `GatewayTimeout`, and `ServiceUnavailable` are the domain
/// mapping of the gateway classification; `InvalidQuantity` never reaches any
/// network or storage call; `Storage` is opaque infrastructure failure.
/// Retries happen only inside the transport — once a failure reaches this
/// layer it is surfaced immediately.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{0} did not respond in time")]
    GatewayTimeout(&'static str),

    #[error("{0} is currently unavailable")]
    ServiceUnavailable(&'static str),

    #[error("quantity must be non-negative, got {0}")]
    InvalidQuantity(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl InventoryError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }
}

/// Orchestrates validation, storage, and change-event emission.
///
/// Dependency validation always precedes the storage write: no inventory row
/// is ever created or mutated for a product that does not exist upstream.
#[derive(Debug, Clone)]
pub struct InventoryService<G, S, K> {
    gateway: G,
    store: S,
    sink: K,
}

impl<G, S, K> InventoryService<G, S, K>
where
    G: ProductGateway,
    S: InventoryStore,
    K: EventSink<InventoryChangeEvent>,
{
    pub fn new(gateway: G, store: S, sink: K) -> Self {
        Self { gateway, store, sink }
    }

    /// Current stock for a product, after confirming the product exists.
    pub async fn get_by_product_id(
        &self,
        product_id: &str,
    ) -> Result<InventoryRecord, InventoryError> {
        self.validate_product(product_id).await?;

        self.store
            .find(product_id)
            .await?
            .ok_or_else(|| InventoryError::not_found("Inventory", product_id))
    }

    /// Set the absolute stock level for a product (create-or-replace).
    pub async fn update_stock(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<InventoryRecord, InventoryError> {
        if quantity < 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        self.validate_product(product_id).await?;

        // Snapshot for the delta. A concurrent writer may land between this
        // read and the upsert, in which case `previous_quantity` reflects a
        // superseded value; the upsert itself stays atomic either way.
        let previous = self.store.find(product_id).await?;

        let record = self.store.upsert(product_id, quantity).await?;

        self.sink.emit(change_event(
            product_id,
            previous.map(|r| r.quantity),
            quantity,
        ));

        Ok(record)
    }

    async fn validate_product(&self, product_id: &str) -> Result<ProductRef, InventoryError> {
        self.gateway
            .validate_exists(product_id)
            .await
            .map_err(|classification| match classification {
                GatewayError::NotFound => InventoryError::not_found("Product", product_id),
                GatewayError::Timeout => InventoryError::GatewayTimeout(PRODUCTS_SERVICE),
                GatewayError::Unavailable => InventoryError::ServiceUnavailable(PRODUCTS_SERVICE),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use storefront_events::RecordingEventSink;

    use super::*;

    /// Gateway stub with a fixed outcome and an invocation counter.
    struct StubGateway {
        outcome: Result<ProductRef, GatewayError>,
        calls: AtomicU32,
    }

    impl StubGateway {
        fn ok() -> Self {
            Self::with(Ok(ProductRef {
                id: "prod-123".to_string(),
                name: "Test Product".to_string(),
                sku: "TEST-001".to_string(),
            }))
        }

        fn with(outcome: Result<ProductRef, GatewayError>) -> Self {
            Self {
                outcome,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductGateway for StubGateway {
        async fn validate_exists(&self, _product_id: &str) -> Result<ProductRef, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    /// In-memory store with an upsert counter.
    #[derive(Default)]
    struct StubStore {
        rows: Mutex<HashMap<String, InventoryRecord>>,
        upserts: AtomicU32,
    }

    impl StubStore {
        fn upserts(&self) -> u32 {
            self.upserts.load(Ordering::SeqCst)
        }

        fn seed(&self, product_id: &str, quantity: i64) {
            let now = Utc::now();
            self.rows.lock().unwrap().insert(
                product_id.to_string(),
                InventoryRecord {
                    id: Uuid::now_v7(),
                    product_id: product_id.to_string(),
                    quantity,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
    }

    #[async_trait]
    impl InventoryStore for StubStore {
        async fn find(&self, product_id: &str) -> Result<Option<InventoryRecord>, StorageError> {
            Ok(self.rows.lock().unwrap().get(product_id).cloned())
        }

        async fn upsert(
            &self,
            product_id: &str,
            quantity: i64,
        ) -> Result<InventoryRecord, StorageError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let now = Utc::now();
            let record = rows
                .entry(product_id.to_string())
                .and_modify(|r| {
                    r.quantity = quantity;
                    r.updated_at = now;
                })
                .or_insert_with(|| InventoryRecord {
                    id: Uuid::now_v7(),
                    product_id: product_id.to_string(),
                    quantity,
                    created_at: now,
                    updated_at: now,
                });
            Ok(record.clone())
        }
    }

    type TestService =
        InventoryService<Arc<StubGateway>, Arc<StubStore>, Arc<RecordingEventSink<InventoryChangeEvent>>>;

    fn service(gateway: StubGateway) -> (TestService, Arc<StubGateway>, Arc<StubStore>, Arc<RecordingEventSink<InventoryChangeEvent>>) {
        let gateway = Arc::new(gateway);
        let store = Arc::new(StubStore::default());
        let sink = Arc::new(RecordingEventSink::new());
        let service = InventoryService::new(Arc::clone(&gateway), Arc::clone(&store), Arc::clone(&sink));
        (service, gateway, store, sink)
    }

    #[tokio::test]
    async fn get_returns_record_for_existing_product() {
        let (service, _, store, _) = service(StubGateway::ok());
        store.seed("prod-123", 100);

        let record = service.get_by_product_id("prod-123").await.unwrap();
        assert_eq!(record.quantity, 100);
    }

    #[tokio::test]
    async fn get_without_record_is_inventory_not_found() {
        let (service, _, _, _) = service(StubGateway::ok());

        match service.get_by_product_id("prod-123").await.unwrap_err() {
            InventoryError::NotFound { resource, .. } => assert_eq!(resource, "Inventory"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn gateway_classifications_map_one_to_one() {
        {
            let (service, _, _, _) = service(StubGateway::with(Err(GatewayError::NotFound)));
            match service.get_by_product_id("prod-999").await.unwrap_err() {
                InventoryError::NotFound { resource, id } => {
                    assert_eq!(resource, "Product");
                    assert_eq!(id, "prod-999");
                }
                other => panic!("expected NotFound, got {other:?}"),
            }
        }

        {
            let (service, _, _, _) = service(StubGateway::with(Err(GatewayError::Timeout)));
            match service.get_by_product_id("prod-123").await.unwrap_err() {
                InventoryError::GatewayTimeout(_) => {}
                other => panic!("expected GatewayTimeout, got {other:?}"),
            }
        }

        {
            let (service, _, _, _) = service(StubGateway::with(Err(GatewayError::Unavailable)));
            match service.update_stock("prod-123", 5).await.unwrap_err() {
                InventoryError::ServiceUnavailable(_) => {}
                other => panic!("expected ServiceUnavailable, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn missing_product_never_reaches_the_store() {
        let (service, _, store, sink) = service(StubGateway::with(Err(GatewayError::NotFound)));

        service.update_stock("prod-999", 10).await.unwrap_err();

        assert_eq!(store.upserts(), 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn first_mutation_creates_and_emits_created() {
        let (service, _, _, sink) = service(StubGateway::ok());

        let record = service.update_stock("prod-123", 10).await.unwrap();
        assert_eq!(record.quantity, 10);
        assert_eq!(record.created_at, record.updated_at);

        assert_eq!(
            sink.events(),
            vec![InventoryChangeEvent::Created {
                product_id: "prod-123".to_string(),
                quantity: 10,
            }]
        );
    }

    #[tokio::test]
    async fn subsequent_mutation_emits_signed_delta() {
        let (service, _, store, sink) = service(StubGateway::ok());
        store.seed("prod-123", 10);

        let record = service.update_stock("prod-123", 7).await.unwrap();
        assert_eq!(record.quantity, 7);

        assert_eq!(
            sink.events(),
            vec![InventoryChangeEvent::Updated {
                product_id: "prod-123".to_string(),
                previous_quantity: 10,
                new_quantity: 7,
                change: -3,
            }]
        );
    }

    #[tokio::test]
    async fn repeated_update_performs_full_upsert_with_zero_delta() {
        let (service, _, store, sink) = service(StubGateway::ok());

        service.update_stock("prod-123", 50).await.unwrap();
        let record = service.update_stock("prod-123", 50).await.unwrap();

        assert_eq!(record.quantity, 50);
        // No short-circuit: both calls hit the store.
        assert_eq!(store.upserts(), 2);
        assert_eq!(store.rows.lock().unwrap().len(), 1);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            InventoryChangeEvent::Updated {
                product_id: "prod-123".to_string(),
                previous_quantity: 50,
                new_quantity: 50,
                change: 0,
            }
        );
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected_before_any_call() {
        let (service, gateway, store, sink) = service(StubGateway::ok());

        match service.update_stock("prod-123", -1).await.unwrap_err() {
            InventoryError::InvalidQuantity(q) => assert_eq!(q, -1),
            other => panic!("expected InvalidQuantity, got {other:?}"),
        }

        assert_eq!(gateway.calls(), 0);
        assert_eq!(store.upserts(), 0);
        assert!(sink.is_empty());
    }
}
