//! HTTP adapter for the [`ProductGateway`] port.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use storefront_inventory::{GatewayError, ProductGateway, ProductRef};

use crate::http::transport::{ConnectionErrorKind, RetryingHttpClient};

/// Success envelope served by the products service.
#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    data: ProductDocument,
}

#[derive(Debug, Deserialize)]
struct ProductDocument {
    id: String,
    attributes: ProductAttributes,
}

#[derive(Debug, Deserialize)]
struct ProductAttributes {
    name: String,
    sku: String,
}

/// Validates product existence with a live `GET /api/v1/products/{id}`.
///
/// Status inspection takes precedence over connection-error inspection: a
/// well-formed 404 that arrives after a string of retried connection failures
/// still classifies as `NotFound`, not as an outage.
#[derive(Debug, Clone)]
pub struct HttpProductGateway {
    client: RetryingHttpClient,
}

impl HttpProductGateway {
    pub fn new(client: RetryingHttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductGateway for HttpProductGateway {
    async fn validate_exists(&self, product_id: &str) -> Result<ProductRef, GatewayError> {
        let path = format!("/api/v1/products/{product_id}");

        match self.client.get(&path).await {
            Ok(response) if response.status.is_success() => {
                match serde_json::from_str::<ProductEnvelope>(&response.body) {
                    Ok(envelope) => Ok(ProductRef {
                        id: envelope.data.id,
                        name: envelope.data.attributes.name,
                        sku: envelope.data.attributes.sku,
                    }),
                    Err(err) => {
                        // A malformed success body is indistinguishable from a
                        // misconfigured remote; treat it like an outage.
                        warn!(product_id, error = %err, "malformed product envelope");
                        Err(GatewayError::Unavailable)
                    }
                }
            }
            Ok(response) if response.status == StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            Ok(response) => {
                warn!(
                    product_id,
                    status = %response.status,
                    attempts = response.attempts,
                    "unexpected status from products service"
                );
                Err(GatewayError::Unavailable)
            }
            Err(err) => match err.kind {
                ConnectionErrorKind::TimedOut => Err(GatewayError::Timeout),
                ConnectionErrorKind::Refused | ConnectionErrorKind::Other => {
                    Err(GatewayError::Unavailable)
                }
            },
        }
    }
}
