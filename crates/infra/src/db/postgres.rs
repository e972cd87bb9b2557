//! Postgres adapters (sqlx).
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE products (
//!     id          UUID PRIMARY KEY,
//!     name        TEXT NOT NULL,
//!     description TEXT,
//!     price_cents BIGINT NOT NULL,
//!     sku         TEXT NOT NULL UNIQUE,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE inventory (
//!     id         UUID PRIMARY KEY,
//!     product_id TEXT NOT NULL UNIQUE,
//!     quantity   BIGINT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use storefront_core::StorageError;
use storefront_inventory::{InventoryRecord, InventoryStore};
use storefront_products::{Product, ProductError, ProductRepository};

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Postgres-backed inventory store.
///
/// The upsert is a single `INSERT ... ON CONFLICT DO UPDATE`, so concurrent
/// writers for the same `product_id` serialize inside the database and the
/// unique constraint enforces the one-record-per-product invariant.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn inventory_from_row(row: &sqlx::postgres::PgRow) -> Result<InventoryRecord, sqlx::Error> {
    Ok(InventoryRecord {
        id: row.try_get::<Uuid, _>("id")?,
        product_id: row.try_get::<String, _>("product_id")?,
        quantity: row.try_get::<i64, _>("quantity")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn find(&self, product_id: &str) -> Result<Option<InventoryRecord>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, product_id, quantity, created_at, updated_at
            FROM inventory
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::new)?;

        row.as_ref()
            .map(inventory_from_row)
            .transpose()
            .map_err(StorageError::new)
    }

    async fn upsert(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<InventoryRecord, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO inventory (id, product_id, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (product_id) DO UPDATE
            SET quantity = EXCLUDED.quantity, updated_at = NOW()
            RETURNING id, product_id, quantity, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::new)?;

        inventory_from_row(&row).map_err(StorageError::new)
    }
}

/// Postgres-backed product repository.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn product_from_row(row: &sqlx::postgres::PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get::<Uuid, _>("id")?,
        name: row.try_get::<String, _>("name")?,
        description: row.try_get::<Option<String>, _>("description")?,
        price_cents: row.try_get::<i64, _>("price_cents")?,
        sku: row.try_get::<String, _>("sku")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, product: Product) -> Result<Product, ProductError> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, sku, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, price_cents, sku, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.sku)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ProductError::sku_conflict(product.sku.clone())
            } else {
                ProductError::Storage(StorageError::new(err))
            }
        })?;

        product_from_row(&row).map_err(|e| ProductError::Storage(StorageError::new(e)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, sku, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::new)?;

        row.as_ref()
            .map(product_from_row)
            .transpose()
            .map_err(StorageError::new)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Product>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, sku, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::new)?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::new)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::new)?;

        let total: i64 = row.try_get("total").map_err(StorageError::new)?;
        Ok(total as u64)
    }

    async fn update(&self, product: Product) -> Result<Product, ProductError> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, sku = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, name, description, price_cents, sku, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.sku)
        .bind(product.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ProductError::sku_conflict(product.sku.clone())
            } else {
                ProductError::Storage(StorageError::new(err))
            }
        })?;

        match row {
            Some(row) => product_from_row(&row).map_err(|e| ProductError::Storage(StorageError::new(e))),
            None => Err(ProductError::not_found(product.id.to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::new)?;

        Ok(result.rows_affected() > 0)
    }
}
