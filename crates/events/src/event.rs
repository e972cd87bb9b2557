//! Domain event contract.

/// A domain event: an immutable fact produced by a workflow.
///
/// Events are values, not messages — they carry no delivery metadata. The
/// `event_type` is a stable dotted name (e.g. `inventory.updated`) used as the
/// discriminator in structured logs and downstream consumers.
pub trait Event: Send + Sync {
    fn event_type(&self) -> &'static str;
}
