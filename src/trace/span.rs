//! Span handle and the event it turns into when sent.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::observability::metrics;
use crate::trace::transmission::Transmission;

/// A finished span, as handed to a [`Transmission`].
#[derive(Debug, Clone, Serialize)]
pub struct SpanEvent {
    /// Span start in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub dataset: String,
    pub fields: Map<String, Value>,
}

impl SpanEvent {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value of a field, `None` when absent or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Iterate over fields whose key starts with `prefix`.
    pub fn fields_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.fields.iter().filter(move |(k, _)| k.starts_with(prefix))
    }
}

/// Handle to one traced unit of work.
///
/// Clones share the same underlying span: fields added through any clone
/// end up on the same event. The span is transmitted on the first call to
/// [`Span::send`]; later calls are ignored.
#[derive(Clone)]
pub struct Span {
    inner: Arc<SpanInner>,
}

struct SpanInner {
    trace_id: String,
    span_id: String,
    parent_id: Option<String>,
    dataset: String,
    started_at: Instant,
    timestamp_ms: u64,
    fields: Mutex<Map<String, Value>>,
    sent: AtomicBool,
    transmission: Arc<dyn Transmission>,
}

impl Span {
    pub(crate) fn new(
        trace_id: String,
        span_id: String,
        parent_id: Option<String>,
        dataset: String,
        transmission: Arc<dyn Transmission>,
    ) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            inner: Arc::new(SpanInner {
                trace_id,
                span_id,
                parent_id,
                dataset,
                started_at: Instant::now(),
                timestamp_ms,
                fields: Mutex::new(Map::new()),
                sent: AtomicBool::new(false),
                transmission,
            }),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.inner.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.inner.span_id
    }

    /// Id of the upstream span when this span continues a propagated trace.
    pub fn parent_id(&self) -> Option<&str> {
        self.inner.parent_id.as_deref()
    }

    /// True when the span starts a new trace.
    pub fn is_root(&self) -> bool {
        self.inner.parent_id.is_none()
    }

    /// Attach a field. A later write to the same key replaces the earlier one.
    /// Fields added after the span was sent are dropped.
    pub fn add_field(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut fields = self.inner.fields.lock().expect("span field mutex poisoned");
        fields.insert(key.into(), value.into());
    }

    /// Current value of a field on an unsent span.
    pub fn field(&self, key: &str) -> Option<Value> {
        let fields = self.inner.fields.lock().expect("span field mutex poisoned");
        fields.get(key).cloned()
    }

    pub fn is_sent(&self) -> bool {
        self.inner.sent.load(Ordering::Acquire)
    }

    /// Finish the span and hand it to the transmission.
    pub fn send(&self) {
        if self.inner.sent.swap(true, Ordering::AcqRel) {
            return;
        }

        let duration_ms = self.inner.started_at.elapsed().as_secs_f64() * 1000.0;
        let mut fields = {
            let mut fields = self.inner.fields.lock().expect("span field mutex poisoned");
            std::mem::take(&mut *fields)
        };
        fields.insert("duration_ms".to_string(), Value::from(duration_ms));

        let event = SpanEvent {
            timestamp_ms: self.inner.timestamp_ms,
            dataset: self.inner.dataset.clone(),
            fields,
        };

        metrics::record_span_sent(&self.inner.dataset, duration_ms);
        self.inner.transmission.send(event);
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("trace_id", &self.inner.trace_id)
            .field("span_id", &self.inner.span_id)
            .field("parent_id", &self.inner.parent_id)
            .field("sent", &self.is_sent())
            .finish()
    }
}

/// Handlers take the request span as an extractor to add their own fields.
impl<S> FromRequestParts<S> for Span
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Span>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "No request span; is SpanDecorationLayer installed?",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::transmission::MemoryTransmission;

    fn span_with(memory: &Arc<MemoryTransmission>) -> Span {
        Span::new(
            "trace-1".into(),
            "span-1".into(),
            None,
            "test".into(),
            memory.clone(),
        )
    }

    #[test]
    fn test_send_is_idempotent() {
        let memory = Arc::new(MemoryTransmission::new());
        let span = span_with(&memory);

        span.add_field("name", "first");
        span.send();
        span.send();
        span.clone().send();

        assert_eq!(memory.len(), 1);
        assert!(span.is_sent());
    }

    #[test]
    fn test_last_write_wins_and_clones_share_fields() {
        let memory = Arc::new(MemoryTransmission::new());
        let span = span_with(&memory);
        let other = span.clone();

        span.add_field("name", "a");
        other.add_field("name", "b");
        other.add_field("count", 3);
        span.send();

        let event = memory.last().unwrap();
        assert_eq!(event.str_field("name"), Some("b"));
        assert_eq!(event.field("count"), Some(&Value::from(3)));
        assert!(event.field("duration_ms").is_some());
        assert_eq!(event.dataset, "test");
    }

    #[test]
    fn test_fields_after_send_are_dropped() {
        let memory = Arc::new(MemoryTransmission::new());
        let span = span_with(&memory);
        span.send();
        span.add_field("late", true);

        let event = memory.last().unwrap();
        assert!(event.field("late").is_none());
    }
}
