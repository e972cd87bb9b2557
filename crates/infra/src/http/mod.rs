//! Outbound HTTP: retrying transport + the products-service gateway built on it.

pub mod products_gateway;
pub mod transport;
