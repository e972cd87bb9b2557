//! `storefront-inventory` — stock levels keyed by product.
//!
//! The inventory service never trusts a product id on its own: every mutation
//! first confirms the product exists upstream via the [`ProductGateway`] port,
//! whose failures collapse into a closed three-way classification. Only then
//! does the workflow touch the [`InventoryStore`]. Adapters for both ports
//! live in `storefront-infra`.

pub mod events;
pub mod gateway;
pub mod record;
pub mod service;
pub mod store;

pub use events::{change_event, InventoryChangeEvent};
pub use gateway::{GatewayError, ProductGateway, ProductRef};
pub use record::InventoryRecord;
pub use service::{InventoryError, InventoryService};
pub use store::InventoryStore;
