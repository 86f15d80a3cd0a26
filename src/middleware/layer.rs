//! Tower layer composing span lifecycle, route metadata and response
//! observation around the wrapped service.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use http_body::Body as HttpBody;
use tower::{Layer, Service};

use crate::middleware::extractor::RouteMetadata;
use crate::middleware::lifecycle::SpanLifecycle;
use crate::middleware::observer::ResponseObserver;
use crate::middleware::IncomingConfig;
use crate::routing::{AxumRoutes, RouteLookup};
use crate::trace::{Span, Tracer};

/// Layer that traces every request passing through it.
///
/// Install it with `Router::layer` so it runs after axum has matched the
/// route:
///
/// ```ignore
/// let routes = RouteRegistry::new()
///     .named_route("/users/{id}", "getUser", HandlerIdentity::function(&get_user));
///
/// let app = Router::new()
///     .route("/users/{id}", get(get_user))
///     .layer(SpanDecorationLayer::new(tracer, AxumRoutes::new(routes)));
/// ```
pub struct SpanDecorationLayer<L = AxumRoutes> {
    lifecycle: SpanLifecycle,
    routes: Arc<L>,
}

impl<L: RouteLookup> SpanDecorationLayer<L> {
    pub fn new(tracer: Tracer, routes: L) -> Self {
        Self {
            lifecycle: SpanLifecycle::new(tracer, IncomingConfig::default()),
            routes: Arc::new(routes),
        }
    }

    /// Install a custom header parser and/or request decorator.
    pub fn with_config(self, config: IncomingConfig) -> Self {
        Self {
            lifecycle: SpanLifecycle::new(self.lifecycle.tracer().clone(), config),
            routes: self.routes,
        }
    }
}

impl<L> Clone for SpanDecorationLayer<L> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            routes: self.routes.clone(),
        }
    }
}

impl<S, L> Layer<S> for SpanDecorationLayer<L> {
    type Service = SpanDecorationService<S, L>;

    fn layer(&self, inner: S) -> Self::Service {
        SpanDecorationService {
            inner,
            lifecycle: self.lifecycle.clone(),
            routes: self.routes.clone(),
        }
    }
}

/// Service produced by [`SpanDecorationLayer`].
pub struct SpanDecorationService<S, L = AxumRoutes> {
    inner: S,
    lifecycle: SpanLifecycle,
    routes: Arc<L>,
}

impl<S: Clone, L> Clone for SpanDecorationService<S, L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            lifecycle: self.lifecycle.clone(),
            routes: self.routes.clone(),
        }
    }
}

impl<S, L, ReqBody, ResBody> Service<Request<ReqBody>> for SpanDecorationService<S, L>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    L: RouteLookup,
    ReqBody: Send + 'static,
    ResBody: HttpBody + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let (mut parts, body) = request.into_parts();

        let guard = self.lifecycle.begin(&mut parts);
        self.lifecycle.decorate(&parts, guard.span());

        let mut observer = ResponseObserver::new();

        let route = self.routes.matched_route(&parts);
        let variables = self.routes.path_variables(&mut parts);
        RouteMetadata::extract(route.as_ref(), variables).apply(guard.span());

        // `parts` carries the span in its extensions from here on.
        let response_future = self.inner.call(Request::from_parts(parts, body));

        Box::pin(async move {
            let response = response_future.await?;
            let response = observer.observe(response);
            record_response(guard.span(), &observer);
            Ok(response)
        })
    }
}

fn record_response(span: &Span, observer: &ResponseObserver) {
    if let Some(length) = observer.content_length() {
        span.add_field("response.content_length", length);
    }
    if let Some(content_type) = observer.content_type() {
        span.add_field("response.content_type", content_type);
    }
    if let Some(encoding) = observer.content_encoding() {
        span.add_field("response.content_encoding", encoding);
    }
    span.add_field("response.status_code", observer.status().as_u16());
}
