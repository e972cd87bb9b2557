//! Upstream product validation port.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read-only view of a product as served by the products service.
///
/// Fetched live on every validation call — never cached, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub sku: String,
}

/// Closed classification of a failed product lookup.
///
/// Every transport outcome collapses into exactly one of these three; the
/// workflow pattern-matches on them, so the set is enforceable at compile
/// time. A well-formed 404 is a different failure domain than a dropped
/// connection, even when both arrive after a retry sequence:
///
/// - `NotFound` — the upstream answered 404; permanent, not retried.
/// - `Timeout` — connection attempts were aborted/timed out past the retry
///   budget; the caller may retry the whole request later.
/// - `Unavailable` — the upstream was unreachable, answered with an
///   unexpected status, or returned a malformed body. The safe default:
///   a misconfigured remote is indistinguishable from a remote that is down.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GatewayError {
    #[error("product not found upstream")]
    NotFound,

    #[error("products service timed out")]
    Timeout,

    #[error("products service unavailable")]
    Unavailable,
}

/// "Does this referenced product exist?" — asked before every inventory
/// mutation or read.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn validate_exists(&self, product_id: &str) -> Result<ProductRef, GatewayError>;
}

#[async_trait]
impl<G> ProductGateway for Arc<G>
where
    G: ProductGateway + ?Sized,
{
    async fn validate_exists(&self, product_id: &str) -> Result<ProductRef, GatewayError> {
        (**self).validate_exists(product_id).await
    }
}
