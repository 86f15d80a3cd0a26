//! Observability of the middleware itself.
//!
//! # Data Flow
//! ```text
//! Middleware and trace backend produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (span counters and duration histogram)
//! ```
//!
//! # Design Decisions
//! - Request spans are data, not log lines; they go through a Transmission
//! - Metrics use the `metrics` facade and cost nothing without a recorder

pub mod logging;
pub mod metrics;
