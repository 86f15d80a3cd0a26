//! Span decoration middleware.
//!
//! # Data Flow
//! ```text
//! Request (already matched by axum)
//!     → lifecycle.rs (span created, bound into extensions, guard held)
//!     → request decorator hook (optional)
//!     → extractor.rs (path variables, handler identity, route name/template)
//!     → inner service, called exactly once
//!     → observer.rs (status and content headers of the returned response)
//!     → response fields added, guard dropped, span sent
//! ```
//!
//! # Design Decisions
//! - Routing metadata is captured before the handler runs
//! - The response body is passed through untouched
//! - Handler errors and panics propagate; only the span send is guaranteed

pub mod extractor;
pub mod layer;
pub mod lifecycle;
pub mod observer;

use axum::http::request::Parts;
use std::sync::Arc;

use crate::trace::{HeaderParserHook, PropagationContext, Span};

pub use extractor::{NameCandidates, NameSource, RouteMetadata};
pub use layer::{SpanDecorationLayer, SpanDecorationService};
pub use lifecycle::{BoxError, RequestSpanDecorator, SpanGuard, SpanLifecycle};
pub use observer::ResponseObserver;

/// Optional hooks for the middleware.
#[derive(Clone, Default)]
pub struct IncomingConfig {
    /// Replaces the built-in propagation header parser.
    pub header_parser_hook: Option<HeaderParserHook>,

    /// Called once per request right after the span is created.
    pub request_span_decorator: Option<RequestSpanDecorator>,
}

impl IncomingConfig {
    pub fn with_header_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&Parts) -> Option<PropagationContext> + Send + Sync + 'static,
    {
        self.header_parser_hook = Some(Arc::new(parser));
        self
    }

    pub fn with_request_decorator<F>(mut self, decorator: F) -> Self
    where
        F: Fn(&Parts, &Span) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.request_span_decorator = Some(Arc::new(decorator));
        self
    }
}

impl std::fmt::Debug for IncomingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncomingConfig")
            .field("header_parser_hook", &self.header_parser_hook.is_some())
            .field("request_span_decorator", &self.request_span_decorator.is_some())
            .finish()
    }
}
