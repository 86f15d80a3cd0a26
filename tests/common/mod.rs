//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{request::Parts, Request};
use beeline_router::routing::{PathVariables, RouteDescriptor, RouteLookup};
use beeline_router::trace::{MemoryTransmission, SpanEvent, Tracer};

/// A tracer whose spans are collected in memory.
pub fn memory_tracer() -> (Tracer, Arc<MemoryTransmission>) {
    let memory = Arc::new(MemoryTransmission::new());
    let tracer = Tracer::new("test-service", "test-dataset", memory.clone());
    (tracer, memory)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// The single span sent so far; fails if there is not exactly one.
pub fn only_span(memory: &MemoryTransmission) -> SpanEvent {
    let events = memory.events();
    assert_eq!(events.len(), 1, "expected exactly one span, got {events:?}");
    events.into_iter().next().unwrap()
}

pub fn has_prefix(event: &SpanEvent, prefix: &str) -> bool {
    event.fields_with_prefix(prefix).next().is_some()
}

/// Route lookup with a fixed answer, for services not behind an axum Router.
#[allow(dead_code)]
pub struct StaticRoutes {
    pub route: Option<RouteDescriptor>,
    pub variables: PathVariables,
}

impl RouteLookup for StaticRoutes {
    fn matched_route(&self, _parts: &Parts) -> Option<RouteDescriptor> {
        self.route.clone()
    }

    fn path_variables(&self, _parts: &mut Parts) -> PathVariables {
        self.variables.clone()
    }
}
