//! Product CRUD service and its persistence port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use storefront_core::{PageParams, StorageError};

use crate::product::{NewProduct, Product, ProductError, ProductPatch};

/// Persistence port for products.
///
/// `insert` and `update` report SKU uniqueness violations as
/// [`ProductError::SkuConflict`]; everything else infrastructural surfaces as
/// [`ProductError::Storage`].
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> Result<Product, ProductError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError>;

    /// Newest-first page of products.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Product>, StorageError>;

    async fn count(&self) -> Result<u64, StorageError>;

    async fn update(&self, product: Product) -> Result<Product, ProductError>;

    /// Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn insert(&self, product: Product) -> Result<Product, ProductError> {
        (**self).insert(product).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        (**self).find_by_id(id).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Product>, StorageError> {
        (**self).list(offset, limit).await
    }

    async fn count(&self) -> Result<u64, StorageError> {
        (**self).count().await
    }

    async fn update(&self, product: Product) -> Result<Product, ProductError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        (**self).delete(id).await
    }
}

/// Application service for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductService<R> {
    repository: R,
}

impl<R> ProductService<R>
where
    R: ProductRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, ProductError> {
        validate_name(&input.name)?;
        validate_sku(&input.sku)?;
        validate_price(input.price_cents)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price_cents: input.price_cents,
            sku: input.sku,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(product).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Product, ProductError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::not_found(id.to_string()))
    }

    /// One page of products plus the total row count.
    pub async fn list(&self, params: PageParams) -> Result<(Vec<Product>, u64), ProductError> {
        let products = self
            .repository
            .list(params.offset(), params.limit())
            .await?;
        let total = self.repository.count().await?;
        Ok((products, total))
    }

    pub async fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Product, ProductError> {
        let mut product = self.find_by_id(id).await?;

        if let Some(name) = patch.name {
            validate_name(&name)?;
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(price_cents) = patch.price_cents {
            validate_price(price_cents)?;
            product.price_cents = price_cents;
        }
        if let Some(sku) = patch.sku {
            validate_sku(&sku)?;
            product.sku = sku;
        }
        product.updated_at = Utc::now();

        self.repository.update(product).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        // Surface a domain not-found rather than a silent no-op.
        if !self.repository.delete(id).await? {
            return Err(ProductError::not_found(id.to_string()));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::validation("name cannot be empty"));
    }
    Ok(())
}

fn validate_sku(sku: &str) -> Result<(), ProductError> {
    if sku.trim().is_empty() {
        return Err(ProductError::validation("sku cannot be empty"));
    }
    Ok(())
}

fn validate_price(price_cents: i64) -> Result<(), ProductError> {
    if price_cents < 0 {
        return Err(ProductError::validation("price cannot be negative"));
    }
    Ok(())
}
