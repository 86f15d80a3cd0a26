//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Trace backend settings.
    pub tracer: TracerConfig,

    /// Demo server settings.
    pub server: ServerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Where finished spans go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransmissionKind {
    /// Structured log event on the `beeline.span` target.
    #[default]
    Log,
    /// One JSON object per line on stdout.
    Stdout,
    /// Drop every span.
    Discard,
}

/// Trace backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Added to every span as `service_name`.
    pub service_name: String,

    /// Dataset for root spans; propagated traces may carry their own.
    pub dataset: String,

    pub transmission: TransmissionKind,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            service_name: "beeline-router".to_string(),
            dataset: "http-requests".to_string(),
            transmission: TransmissionKind::Log,
        }
    }
}

/// Demo server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`.
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
