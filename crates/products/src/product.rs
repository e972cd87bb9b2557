use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use storefront_core::StorageError;

/// Catalog entry. Prices are stored in the smallest currency unit (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub sku: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub sku: String,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub sku: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.sku.is_none()
    }
}

/// Failures surfaced by the product service and repository.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with id '{0}' not found")]
    NotFound(String),

    #[error("Product with SKU '{0}' already exists")]
    SkuConflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProductError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn sku_conflict(sku: impl Into<String>) -> Self {
        Self::SkuConflict(sku.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
