//! Per-request span lifecycle.
//!
//! # Responsibilities
//! - Create exactly one span per request (default parser or custom hook)
//! - Bind it into the request extensions for downstream handlers
//! - Send it exactly once, on every exit path
//!
//! # Design Decisions
//! - `SpanGuard` sends on drop: normal return, inner error, panic unwind and
//!   a dropped response future all end up in the same place
//! - Decorator errors are logged and swallowed; the span is still sent

use std::sync::Arc;

use axum::http::request::Parts;

use crate::middleware::IncomingConfig;
use crate::trace::{HeaderParserHook, Span, Tracer};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Adds caller-specific fields right after span creation.
pub type RequestSpanDecorator = Arc<dyn Fn(&Parts, &Span) -> Result<(), BoxError> + Send + Sync>;

#[derive(Clone)]
pub struct SpanLifecycle {
    tracer: Tracer,
    header_parser: Option<HeaderParserHook>,
    decorator: Option<RequestSpanDecorator>,
}

impl SpanLifecycle {
    pub fn new(tracer: Tracer, config: IncomingConfig) -> Self {
        Self {
            tracer,
            header_parser: config.header_parser_hook,
            decorator: config.request_span_decorator,
        }
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Start the request span and make it reachable from `parts.extensions`.
    pub fn begin(&self, parts: &mut Parts) -> SpanGuard {
        let span = match &self.header_parser {
            Some(parser) => self
                .tracer
                .start_span_with_header_parser(parts, parser.as_ref()),
            None => self.tracer.start_span_from_request(parts),
        };
        parts.extensions.insert(span.clone());
        SpanGuard { span }
    }

    /// Run the configured request decorator, if any.
    pub fn decorate(&self, parts: &Parts, span: &Span) {
        let Some(decorator) = &self.decorator else {
            return;
        };
        if let Err(e) = decorator(parts, span) {
            tracing::warn!(
                trace_id = %span.trace_id(),
                error = %e,
                "Request span decorator failed"
            );
        }
    }
}

impl std::fmt::Debug for SpanLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanLifecycle")
            .field("tracer", &self.tracer)
            .field("header_parser", &self.header_parser.is_some())
            .field("decorator", &self.decorator.is_some())
            .finish()
    }
}

/// Owns the request span; sends it when dropped.
#[must_use = "dropping the guard sends the span immediately"]
#[derive(Debug)]
pub struct SpanGuard {
    span: Span,
}

impl SpanGuard {
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::debug!(trace_id = %self.span.trace_id(), "Sending span during unwind");
        }
        self.span.send();
    }
}
