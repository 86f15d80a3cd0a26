//! Routed span decoration for axum services.
//!
//! Every request gets one span, continued from upstream propagation headers
//! when present, decorated with the matched route (template, path variables,
//! handler identity, declared name) and the response the handler produced
//! (status, content headers), then sent exactly once.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;
pub mod trace;

pub use config::AppConfig;
pub use middleware::{IncomingConfig, SpanDecorationLayer};
pub use routing::{AxumRoutes, HandlerIdentity, RouteRegistry};
pub use trace::{Span, Tracer};
