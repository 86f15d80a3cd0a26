//! Demo HTTP service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum Router, tower-http trace + timeout)
//!     → axum route matching
//!     → SpanDecorationLayer (span per request)
//!     → handlers.rs (users, order items, health)
//!     → response back through the layer, span sent
//! ```

pub mod handlers;
pub mod server;

pub use server::HttpServer;
