//! Demo server for the span decoration middleware.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ axum Router ──▶ route match ──▶ SpanDecorationLayer ──▶ handler
//!                                                        │        ▲
//!                                            span created│        │response observed
//!                                                        ▼        │
//!                                                     Tracer ──▶ Transmission (log/stdout)
//! ```

use std::path::PathBuf;

use beeline_router::config::{load_config, AppConfig};
use beeline_router::http::HttpServer;
use beeline_router::lifecycle::Shutdown;
use beeline_router::middleware::IncomingConfig;
use beeline_router::observability::logging::init_logging;
use beeline_router::trace::{Span, Tracer};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "beeline-router")]
#[command(about = "Demo HTTP server with routed span decoration", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    init_logging(&config.observability)?;
    tracing::info!(
        bind_address = %config.server.bind_address,
        service_name = %config.tracer.service_name,
        transmission = ?config.tracer.transmission,
        "Configuration loaded"
    );

    let tracer = Tracer::from_config(&config.tracer);
    let incoming = IncomingConfig::default().with_request_decorator(|parts, span: &Span| {
        if let Some(id) = parts.headers.get("x-request-id") {
            span.add_field("request.header.x_request_id", id.to_str()?);
        }
        Ok(())
    });

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, tracer, incoming);
    let server_shutdown = shutdown.subscribe();

    let server_task = tokio::spawn(server.run(listener, server_shutdown));
    shutdown.trigger_on_ctrl_c().await?;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
