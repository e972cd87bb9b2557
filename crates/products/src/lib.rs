//! `storefront-products` — product catalog domain.
//!
//! Owns the [`Product`] entity, the [`ProductRepository`] port, and the CRUD
//! [`ProductService`]. Persistence adapters live in `storefront-infra`.

pub mod product;
pub mod service;

pub use product::{NewProduct, Product, ProductError, ProductPatch};
pub use service::{ProductRepository, ProductService};
