//! Tracing, logging (shared setup for both service binaries).

/// Initialize process-wide observability for the named service.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(service: &'static str) {
    tracing::init(service);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
