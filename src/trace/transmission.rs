//! Destinations for finished spans.
//!
//! # Responsibilities
//! - Receive each sent span exactly once
//! - Never block the request path on I/O for long
//!
//! # Design Decisions
//! - `LogTransmission` goes through `tracing`, so spans land wherever logs go
//! - `MemoryTransmission` keeps events for inspection (tests, embedding)

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::config::TransmissionKind;
use crate::trace::span::SpanEvent;

/// Receives finished spans. Shared by every request, so implementations
/// must be safe to call concurrently.
pub trait Transmission: Send + Sync {
    fn send(&self, event: SpanEvent);
}

/// Build the transmission selected in configuration.
pub fn from_kind(kind: TransmissionKind) -> Arc<dyn Transmission> {
    match kind {
        TransmissionKind::Log => Arc::new(LogTransmission),
        TransmissionKind::Stdout => Arc::new(StdoutTransmission),
        TransmissionKind::Discard => Arc::new(DiscardTransmission),
    }
}

/// Emits each span as a structured log event on the `beeline.span` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransmission;

impl Transmission for LogTransmission {
    fn send(&self, event: SpanEvent) {
        match serde_json::to_string(&event.fields) {
            Ok(fields) => tracing::info!(
                target: "beeline.span",
                dataset = %event.dataset,
                timestamp_ms = event.timestamp_ms,
                fields = %fields,
                "span sent"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize span fields"),
        }
    }
}

/// Writes one JSON object per line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutTransmission;

impl Transmission for StdoutTransmission {
    fn send(&self, event: SpanEvent) {
        let mut stdout = std::io::stdout().lock();
        let result = serde_json::to_writer(&mut stdout, &event)
            .map_err(std::io::Error::from)
            .and_then(|_| stdout.write_all(b"\n"));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write span to stdout");
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardTransmission;

impl Transmission for DiscardTransmission {
    fn send(&self, _event: SpanEvent) {}
}

/// Collects sent spans in memory.
#[derive(Debug, Default)]
pub struct MemoryTransmission {
    events: Mutex<Vec<SpanEvent>>,
}

impl MemoryTransmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every span sent so far, oldest first.
    pub fn events(&self) -> Vec<SpanEvent> {
        self.events.lock().expect("memory transmission mutex poisoned").clone()
    }

    pub fn last(&self) -> Option<SpanEvent> {
        self.events
            .lock()
            .expect("memory transmission mutex poisoned")
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("memory transmission mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().expect("memory transmission mutex poisoned").clear();
    }
}

impl Transmission for MemoryTransmission {
    fn send(&self, event: SpanEvent) {
        self.events
            .lock()
            .expect("memory transmission mutex poisoned")
            .push(event);
    }
}
