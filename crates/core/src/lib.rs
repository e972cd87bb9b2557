//! `storefront-core` — shared building blocks for the storefront services.
//!
//! This crate contains **pure** primitives only (no IO, no framework types):
//! the opaque storage failure wrapper and pagination math. Domain logic lives
//! in `storefront-products` / `storefront-inventory`.

pub mod error;
pub mod pagination;

pub use error::StorageError;
pub use pagination::{PageLinks, PageMeta, PageParams};
