//! In-memory store implementations for tests/dev.
//!
//! Same observable semantics as the Postgres adapters: upserts are atomic
//! (one lock acquisition covers the whole create-or-replace), `created_at` is
//! set once, `updated_at` advances on every write.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use storefront_core::StorageError;
use storefront_inventory::{InventoryRecord, InventoryStore};
use storefront_products::{Product, ProductError, ProductRepository};

fn poisoned() -> StorageError {
    StorageError::message("store lock poisoned")
}

/// In-memory inventory store.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    rows: Mutex<HashMap<String, InventoryRecord>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn find(&self, product_id: &str) -> Result<Option<InventoryRecord>, StorageError> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.get(product_id).cloned())
    }

    async fn upsert(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<InventoryRecord, StorageError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
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

/// In-memory product repository.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    rows: Mutex<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: Product) -> Result<Product, ProductError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        if rows.iter().any(|p| p.sku == product.sku) {
            return Err(ProductError::sku_conflict(product.sku));
        }
        rows.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Product>, StorageError> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        let mut sorted = rows.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sorted
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let rows = self.rows.lock().map_err(|_| poisoned())?;
        Ok(rows.len() as u64)
    }

    async fn update(&self, product: Product) -> Result<Product, ProductError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        if rows.iter().any(|p| p.sku == product.sku && p.id != product.id) {
            return Err(ProductError::sku_conflict(product.sku));
        }
        let row = rows
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| ProductError::not_found(product.id.to_string()))?;
        *row = product.clone();
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned())?;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_replaces() {
        let store = InMemoryInventoryStore::new();

        let created = store.upsert("prod-1", 10).await.unwrap();
        assert_eq!(created.quantity, 10);
        assert_eq!(created.created_at, created.updated_at);

        let updated = store.upsert("prod-1", 7).await.unwrap();
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        assert_eq!(store.find("prod-1").await.unwrap().unwrap().quantity, 7);
        assert!(store.find("prod-2").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts_keep_one_record() {
        let store = Arc::new(InMemoryInventoryStore::new());

        let mut handles = Vec::new();
        for quantity in 0..32i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.upsert("prod-1", quantity).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.find("prod-1").await.unwrap().unwrap();
        // Last writer wins; whatever it was, exactly one record exists with
        // one of the written quantities.
        assert!((0..32).contains(&record.quantity));
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }
}
