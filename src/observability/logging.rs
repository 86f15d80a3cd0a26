//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber once per process
//! - Pick pretty or JSON output from configuration
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Span events from `LogTransmission` share the same output

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    }
}

fn default_directives(level: &str) -> String {
    format!("{level},beeline_router={level},beeline.span=info,tower_http=info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(EnvFilter::try_new(default_directives(level)).is_ok());
        }
    }
}
