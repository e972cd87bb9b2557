//! `storefront-events` — domain event emission (mechanics only).
//!
//! Domain crates define their event types and implement [`Event`]; this crate
//! owns the **sink abstraction** they are handed to. Emission is fire-and-forget:
//! a sink never reports failure back into the workflow that produced the event.

pub mod event;
pub mod sink;

pub use event::Event;
pub use sink::{EventSink, RecordingEventSink, TracingEventSink};
