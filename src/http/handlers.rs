//! Handlers served by the demo binary.

use std::convert::Infallible;
use std::future::{ready, Ready};
use std::task::{Context, Poll};

use axum::{
    extract::{Path, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower::Service;

use crate::routing::{HandlerIdentity, RouteRegistry};
use crate::trace::Span;

#[derive(Debug, Serialize)]
pub struct User {
    pub id: u64,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OrderItem {
    pub order_id: String,
    pub item_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

const USERS: &[User] = &[
    User { id: 1, name: "ada" },
    User { id: 2, name: "grace" },
];

pub async fn get_user(span: Span, Path(id): Path<u64>) -> Response {
    span.add_field("app.user_id", id);
    match USERS.iter().find(|u| u.id == id) {
        Some(user) => Json(user).into_response(),
        None => (StatusCode::NOT_FOUND, "User not found").into_response(),
    }
}

pub async fn get_order_item(Path((order_id, item_id)): Path<(String, String)>) -> Json<OrderItem> {
    Json(OrderItem { order_id, item_id })
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "No matching route")
}

/// Health endpoint as a plain service, registered by type.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCheck;

impl Service<Request> for HealthCheck {
    type Response = Response;
    type Error = Infallible;
    type Future = Ready<Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _request: Request) -> Self::Future {
        ready(Ok(Json(HealthStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "ok",
        })
        .into_response()))
    }
}

/// Names and identities for the routes mounted by `HttpServer`.
pub fn route_registry() -> RouteRegistry {
    RouteRegistry::new()
        .named_route("/users/{id}", "getUser", HandlerIdentity::function(&get_user))
        .route(
            "/orders/{order_id}/items/{item_id}",
            HandlerIdentity::function(&get_order_item),
        )
        .route("/health", HandlerIdentity::of_type::<HealthCheck>())
}
