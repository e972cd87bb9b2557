//! Event sinks: where emitted domain events go.
//!
//! ## Design
//!
//! The sink is an injected collaborator with a single fire-and-forget `emit`.
//! Workflows stay testable without a logging backend: production wiring uses
//! [`TracingEventSink`] (structured JSON logs), tests use
//! [`RecordingEventSink`] and assert on what was captured.
//!
//! Delivery is best-effort. A sink that drops an event must not fail the
//! mutation that produced it — the record write is the source of truth.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::event::Event;

/// Receiver of domain events.
pub trait EventSink<E: Event>: Send + Sync {
    /// Hand over one event. No return value, no failure propagation.
    fn emit(&self, event: E);
}

impl<E, S> EventSink<E> for Arc<S>
where
    E: Event,
    S: EventSink<E> + ?Sized,
{
    fn emit(&self, event: E) {
        (**self).emit(event)
    }
}

/// Production sink: events become structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl<E> EventSink<E> for TracingEventSink
where
    E: Event + Serialize,
{
    fn emit(&self, event: E) {
        match serde_json::to_value(&event) {
            Ok(payload) => {
                tracing::info!(event = event.event_type(), %payload, "domain event");
            }
            Err(err) => {
                // Unserializable events are a bug; log and move on.
                tracing::warn!(event = event.event_type(), error = %err, "failed to serialize domain event");
            }
        }
    }
}

/// In-memory sink for tests/dev: captures every emitted event.
#[derive(Debug)]
pub struct RecordingEventSink<E> {
    events: Mutex<Vec<E>>,
}

impl<E> RecordingEventSink<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn events(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for RecordingEventSink<E> {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

impl<E> EventSink<E> for RecordingEventSink<E>
where
    E: Event,
{
    fn emit(&self, event: E) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    struct Ping(u32);

    impl Event for Ping {
        fn event_type(&self) -> &'static str {
            "test.ping"
        }
    }

    #[test]
    fn recording_sink_captures_in_order() {
        let sink = RecordingEventSink::new();
        sink.emit(Ping(1));
        sink.emit(Ping(2));

        assert_eq!(sink.events(), vec![Ping(1), Ping(2)]);
    }

    #[test]
    fn arc_sink_delegates() {
        let sink = Arc::new(RecordingEventSink::new());
        let handle: Arc<RecordingEventSink<Ping>> = Arc::clone(&sink);
        EventSink::emit(&handle, Ping(7));

        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn tracing_sink_accepts_serializable_events() {
        // Smoke test: must not panic without a subscriber installed.
        TracingEventSink::new().emit(Ping(3));
    }
}
