use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock level for one product.
///
/// Invariant: at most one record per `product_id`. Records are created on the
/// first successful mutation for a product, updated in place afterwards, and
/// never deleted by this layer. `product_id` is an external foreign key — the
/// products service owns the referenced entity, so beyond string identity the
/// id is not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: Uuid,
    pub product_id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
