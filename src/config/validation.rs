//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and parseable addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level is not a valid filter: {0}")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.tracer.service_name.trim().is_empty() {
        errors.push(ValidationError::Empty("tracer.service_name"));
    }
    if config.tracer.dataset.trim().is_empty() {
        errors.push(ValidationError::Empty("tracer.dataset"));
    }
    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("server.request_timeout_secs"));
    }
    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.tracer.service_name = " ".into();
        config.server.bind_address = "localhost".into();
        config.server.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Empty("tracer.service_name")));
        assert!(errors.contains(&ValidationError::Zero("server.request_timeout_secs")));
    }
}
