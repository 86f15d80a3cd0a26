//! Trace backend.
//!
//! # Data Flow
//! ```text
//! Incoming request headers
//!     → propagation.rs (X-Honeycomb-Trace / traceparent, or a custom hook)
//!     → tracer.rs (root span or continued trace, request fields)
//!     → span.rs (fields added by middleware and handlers)
//!     → span.send()
//!     → transmission.rs (log, stdout, memory, discard)
//! ```
//!
//! # Design Decisions
//! - A span is a cheap clonable handle; every clone refers to the same event
//! - `send` is idempotent, the first call wins
//! - Transmissions are shared across all requests and must be thread-safe

pub mod propagation;
pub mod span;
pub mod tracer;
pub mod transmission;

pub use propagation::{HeaderParserHook, PropagationContext, PropagationError};
pub use span::{Span, SpanEvent};
pub use tracer::Tracer;
pub use transmission::{
    DiscardTransmission, LogTransmission, MemoryTransmission, StdoutTransmission, Transmission,
};
