//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → Tracer::from_config, logging, demo server
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - Middleware hooks are code, not config; they live in `IncomingConfig`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, LogFormat, ObservabilityConfig, ServerConfig, TracerConfig, TransmissionKind,
};
