//! Inventory persistence port.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::StorageError;

use crate::record::InventoryRecord;

/// Owner of the at-most-one-record-per-product invariant.
///
/// `upsert` is a single atomic create-or-replace: concurrent upserts for the
/// same `product_id` must not interleave into a lost update — the final state
/// is last-writer-wins per the store's own atomicity, not per caller-observed
/// ordering. `created_at` is set only on first creation; `updated_at` advances
/// on every write.
///
/// Failures here are infrastructure, not domain: they propagate as opaque
/// [`StorageError`]s, never as a lookup classification.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find(&self, product_id: &str) -> Result<Option<InventoryRecord>, StorageError>;

    async fn upsert(&self, product_id: &str, quantity: i64) -> Result<InventoryRecord, StorageError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn find(&self, product_id: &str) -> Result<Option<InventoryRecord>, StorageError> {
        (**self).find(product_id).await
    }

    async fn upsert(&self, product_id: &str, quantity: i64) -> Result<InventoryRecord, StorageError> {
        (**self).upsert(product_id, quantity).await
    }
}
