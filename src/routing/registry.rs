//! Route registry and the axum-backed route lookup.
//!
//! # Responsibilities
//! - Store operator-declared names and handler identities per path template
//! - Resolve the matched route from axum's `MatchedPath`
//! - Read bound path variables through `RawPathParams`
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - Templates use axum syntax (`/users/{id}`), exactly as passed to `Router::route`
//! - A matched but unregistered route still yields a descriptor (template only)

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, MatchedPath, RawPathParams};
use axum::http::request::Parts;
use futures_util::FutureExt;

use crate::routing::descriptor::{HandlerIdentity, PathVariables, RouteDescriptor};
use crate::routing::RouteLookup;

/// axum names its internal captures (nest tails, fallbacks) with this prefix.
const AXUM_PRIVATE_PARAM_PREFIX: &str = "__private__axum";

/// Route metadata registered alongside the axum routes.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, RouteDescriptor>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler served at `template`.
    pub fn route(mut self, template: impl Into<String>, handler: HandlerIdentity) -> Self {
        self.routes
            .insert(template.into(), RouteDescriptor::new(handler));
        self
    }

    /// Register the handler served at `template` under an explicit route name.
    pub fn named_route(
        mut self,
        template: impl Into<String>,
        name: impl Into<String>,
        handler: HandlerIdentity,
    ) -> Self {
        self.routes
            .insert(template.into(), RouteDescriptor::new(handler).with_name(name));
        self
    }

    pub fn get(&self, template: &str) -> Option<&RouteDescriptor> {
        self.routes.get(template)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// [`RouteLookup`] over an `axum::Router`.
///
/// Only sees match results when the middleware runs inside the router
/// (`Router::layer`), after axum has matched the request.
#[derive(Debug, Clone, Default)]
pub struct AxumRoutes {
    registry: Arc<RouteRegistry>,
}

impl AxumRoutes {
    pub fn new(registry: RouteRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }
}

impl RouteLookup for AxumRoutes {
    fn matched_route(&self, parts: &Parts) -> Option<RouteDescriptor> {
        let template = parts.extensions.get::<MatchedPath>()?.as_str();
        if template.contains(AXUM_PRIVATE_PARAM_PREFIX) {
            return None;
        }
        let descriptor = self
            .registry
            .get(template)
            .cloned()
            .unwrap_or_default();
        Some(descriptor.with_template(template))
    }

    fn path_variables(&self, parts: &mut Parts) -> PathVariables {
        // Resolves immediately: axum stored the captures while routing.
        match RawPathParams::from_request_parts(parts, &()).now_or_never() {
            Some(Ok(params)) => params
                .iter()
                .filter(|(name, _)| !name.starts_with(AXUM_PRIVATE_PARAM_PREFIX))
                .collect(),
            Some(Err(rejection)) => {
                tracing::trace!(error = %rejection, "No path variables for request");
                PathVariables::default()
            }
            None => PathVariables::default(),
        }
    }
}
