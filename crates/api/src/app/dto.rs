//! Request envelopes and JSON:API-style response serialization.
//!
//! Resources go over the wire as `{ data: { type, id, attributes, links } }`
//! with camelCase attribute keys; collections add `meta` and `links`.

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use storefront_core::{PageLinks, PageMeta};
use storefront_inventory::InventoryRecord;
use storefront_products::Product;

use crate::app::errors;

// -------------------------
// Request envelopes
// -------------------------

/// `{ "data": { "type": ..., "attributes": ... } }`
#[derive(Debug, Deserialize)]
pub struct Document<A> {
    pub data: Resource<A>,
}

#[derive(Debug, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: A,
}

impl<A> Document<A> {
    /// Unwrap the attributes after checking the resource type tag.
    pub fn attributes_of(self, expected: &'static str) -> Result<A, axum::response::Response> {
        if self.data.kind != expected {
            return Err(errors::json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable Entity",
                format!("expected resource type '{expected}'"),
            ));
        }
        Ok(self.data.attributes)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductAttributes {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub sku: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAttributes {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryAttributes {
    pub quantity: i64,
}

// -------------------------
// Response serialization
// -------------------------

fn product_resource(product: &Product) -> Value {
    json!({
        "type": "products",
        "id": product.id.to_string(),
        "attributes": {
            "name": product.name,
            "description": product.description,
            "priceCents": product.price_cents,
            "sku": product.sku,
            "createdAt": product.created_at,
            "updatedAt": product.updated_at,
        },
        "links": { "self": format!("/api/v1/products/{}", product.id) },
    })
}

pub fn product_to_json(product: &Product) -> Value {
    json!({ "data": product_resource(product) })
}

pub fn products_to_json(products: &[Product], meta: &PageMeta, links: &PageLinks) -> Value {
    json!({
        "data": products.iter().map(product_resource).collect::<Vec<_>>(),
        "meta": meta,
        "links": links,
    })
}

pub fn inventory_to_json(record: &InventoryRecord) -> Value {
    json!({
        "data": {
            "type": "inventory",
            "id": record.id.to_string(),
            "attributes": {
                "productId": record.product_id,
                "quantity": record.quantity,
                "createdAt": record.created_at,
                "updatedAt": record.updated_at,
            },
            // Inventory is addressed by product, not by row id.
            "links": { "self": format!("/api/v1/inventory/{}", record.product_id) },
        },
    })
}
