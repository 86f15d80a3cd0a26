//! Routing metadata subsystem.
//!
//! # Data Flow
//! ```text
//! Route definition (at startup):
//!     RouteRegistry::named_route(template, name, handler identity)
//!     → shared via Arc inside AxumRoutes
//!
//! Per request (after axum has matched):
//!     MatchedPath extension → template → registry lookup → RouteDescriptor
//!     url params extension  → RawPathParams → PathVariables
//! ```
//!
//! # Design Decisions
//! - Matching itself is axum's; this module only reads its results
//! - Handler identity comes from registration, not runtime reflection
//! - No matched route is a normal outcome, never an error

pub mod descriptor;
pub mod registry;

use axum::http::request::Parts;

pub use descriptor::{HandlerIdentity, PathVariables, RouteDescriptor, RoutingError};
pub use registry::{AxumRoutes, RouteRegistry};

/// Read access to the router's match result for one request.
pub trait RouteLookup: Send + Sync + 'static {
    /// The route that matched this request, if any.
    fn matched_route(&self, parts: &Parts) -> Option<RouteDescriptor>;

    /// Variables bound by the matched route's pattern.
    fn path_variables(&self, parts: &mut Parts) -> PathVariables;
}
