//! Environment configuration for the service binaries.
//!
//! Follows the twelve-factor convention the services were deployed with:
//! `PORT`, `DATABASE_URL`, `API_KEY`, and (inventory only)
//! `PRODUCTS_SERVICE_URL`. `DATABASE_URL` is optional — without it the
//! binaries fall back to the in-memory stores, which is the dev/test wiring.

use std::env;

use thiserror::Error;
use tracing::warn;

const DEV_API_KEY: &str = "dev-api-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

fn port_from_env(default: u16) -> Result<u16, ConfigError> {
    match env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
            var: "PORT",
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn api_key_from_env() -> String {
    env::var("API_KEY").unwrap_or_else(|_| {
        warn!("API_KEY not set; using insecure dev default");
        DEV_API_KEY.to_string()
    })
}

/// Products service configuration.
#[derive(Debug, Clone)]
pub struct ProductsConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub api_key: String,
}

impl ProductsConfig {
    pub const DEFAULT_PORT: u16 = 3001;

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: port_from_env(Self::DEFAULT_PORT)?,
            database_url: env::var("DATABASE_URL").ok(),
            api_key: api_key_from_env(),
        })
    }
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub port: u16,
    pub database_url: Option<String>,
    /// Shared secret: checked on inbound requests and attached to outbound
    /// calls to the products service.
    pub api_key: String,
    pub products_base_url: String,
}

impl InventoryConfig {
    pub const DEFAULT_PORT: u16 = 3002;
    pub const DEFAULT_PRODUCTS_URL: &'static str = "http://localhost:3001";

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: port_from_env(Self::DEFAULT_PORT)?,
            database_url: env::var("DATABASE_URL").ok(),
            api_key: api_key_from_env(),
            products_base_url: env::var("PRODUCTS_SERVICE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_PRODUCTS_URL.to_string()),
        })
    }
}
