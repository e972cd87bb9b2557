//! Shared infrastructure error model.

use thiserror::Error;

/// Opaque storage-layer failure.
///
/// Database/connection problems are deliberately **not** part of any domain
/// error taxonomy: callers cannot act on them beyond surfacing a 500, so they
/// propagate unclassified. Keep domain failures (not-found, conflicts,
/// validation) in the owning crate's error enum instead.
#[derive(Debug, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(#[from] pub anyhow::Error);

impl StorageError {
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self(err.into())
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(msg.into()))
    }
}
