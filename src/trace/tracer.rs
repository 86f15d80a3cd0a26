//! Span creation for incoming requests.

use std::sync::Arc;

use axum::http::{header, request::Parts};
use uuid::Uuid;

use crate::config::TracerConfig;
use crate::trace::propagation::{default_header_parser, PropagationContext};
use crate::trace::span::Span;
use crate::trace::transmission::{self, Transmission};

/// Creates spans and owns the transmission they are sent through.
#[derive(Clone)]
pub struct Tracer {
    service_name: Arc<str>,
    dataset: Arc<str>,
    transmission: Arc<dyn Transmission>,
}

impl Tracer {
    pub fn new(
        service_name: impl Into<String>,
        dataset: impl Into<String>,
        transmission: Arc<dyn Transmission>,
    ) -> Self {
        Self {
            service_name: Arc::from(service_name.into()),
            dataset: Arc::from(dataset.into()),
            transmission,
        }
    }

    pub fn from_config(config: &TracerConfig) -> Self {
        Self::new(
            config.service_name.clone(),
            config.dataset.clone(),
            transmission::from_kind(config.transmission),
        )
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Start a span for `parts` using the built-in propagation parser.
    pub fn start_span_from_request(&self, parts: &Parts) -> Span {
        self.start_span_with_header_parser(parts, &default_header_parser)
    }

    /// Start a span for `parts`, delegating header interpretation to `parser`.
    ///
    /// A parser returning `None`, or a context without both ids, yields a
    /// root span.
    pub fn start_span_with_header_parser<F>(&self, parts: &Parts, parser: &F) -> Span
    where
        F: Fn(&Parts) -> Option<PropagationContext> + ?Sized,
    {
        let propagated = parser(parts).filter(PropagationContext::is_valid);
        let span = self.start_span(propagated);
        add_request_fields(&span, parts);
        span
    }

    /// Start a span continuing `propagated`, or a new trace when `None`.
    pub fn start_span(&self, propagated: Option<PropagationContext>) -> Span {
        let span_id = new_id();
        let span = match propagated {
            Some(ctx) => {
                let dataset = ctx.dataset.unwrap_or_else(|| self.dataset.to_string());
                let span = Span::new(
                    ctx.trace_id,
                    span_id,
                    Some(ctx.parent_id),
                    dataset,
                    self.transmission.clone(),
                );
                for (key, value) in ctx.trace_fields {
                    span.add_field(key, value);
                }
                span
            }
            None => Span::new(
                new_id(),
                span_id,
                None,
                self.dataset.to_string(),
                self.transmission.clone(),
            ),
        };

        span.add_field("service_name", self.service_name.as_ref());
        span.add_field("trace.trace_id", span.trace_id());
        span.add_field("trace.span_id", span.span_id());
        if let Some(parent_id) = span.parent_id() {
            span.add_field("trace.parent_id", parent_id);
        }

        tracing::trace!(
            trace_id = %span.trace_id(),
            span_id = %span.span_id(),
            root = span.is_root(),
            "Span started"
        );
        span
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("service_name", &self.service_name)
            .field("dataset", &self.dataset)
            .finish_non_exhaustive()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn add_request_fields(span: &Span, parts: &Parts) {
    span.add_field("meta.type", "http_request");
    span.add_field("name", "http_request");
    span.add_field("request.method", parts.method.as_str());
    span.add_field("request.path", parts.uri.path());
    span.add_field("request.http_version", format!("{:?}", parts.version));

    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| parts.uri.host());
    if let Some(host) = host {
        span.add_field("request.host", host);
    }
    if let Some(agent) = parts.headers.get(header::USER_AGENT).and_then(|h| h.to_str().ok()) {
        span.add_field("request.header.user_agent", agent);
    }
    if let Some(length) = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
    {
        span.add_field("request.content_length", length);
    }
}
