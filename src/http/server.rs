//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with the demo handlers
//! - Wire up middleware (span decoration, tower-http trace, timeout)
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::handlers::{self, HealthCheck};
use crate::middleware::{IncomingConfig, SpanDecorationLayer};
use crate::routing::AxumRoutes;
use crate::trace::Tracer;

/// Demo HTTP server with every route traced.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(config: AppConfig, tracer: Tracer, incoming: IncomingConfig) -> Self {
        let router = Self::build_router(&config, tracer, incoming);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, tracer: Tracer, incoming: IncomingConfig) -> Router {
        let spans = SpanDecorationLayer::new(tracer, AxumRoutes::new(handlers::route_registry()))
            .with_config(incoming);

        Router::new()
            .route("/users/{id}", get(handlers::get_user))
            .route("/orders/{order_id}/items/{item_id}", get(handlers::get_order_item))
            .route_service("/health", HealthCheck)
            .fallback(handlers::not_found)
            .layer(spans)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, e.g. for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service_name = %self.config.tracer.service_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
