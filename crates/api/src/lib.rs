//! `storefront-api` — HTTP surface for both services.
//!
//! One axum router per service, built from the same pieces:
//! - `app/services.rs`: wiring (stores, gateway, sink) from config
//! - `app/routes/`: HTTP routes + handlers (one file per domain area)
//! - `app/dto.rs`: request envelopes and JSON:API-style serialization
//! - `app/errors.rs`: consistent error documents
//! - `middleware.rs`: `X-API-Key` authentication

pub mod app;
pub mod middleware;
