//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize JSON logging for `service`, configurable via `RUST_LOG`.
///
/// Safe to call multiple times (subsequent calls are no-ops). The service
/// name is recorded once at startup; per-line fields come from the call
/// sites.
pub fn init(service: &'static str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!(service, "logging initialized");
    }
}
