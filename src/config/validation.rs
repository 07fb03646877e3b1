//! Configuration validation.
//!
//! Serde handles syntax; this checks meaning. Every problem is reported,
//! not just the first one.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{BackoffStrategy, SinkConfig};
use crate::endpoint::EndpointPool;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = EndpointPool::parse(&config.endpoints) {
        errors.push(ValidationError::new("endpoints", e.to_string()));
    }

    if config.backoff == BackoffStrategy::Exponential && config.max_backoff_secs < config.seconds_between_retry {
        errors.push(ValidationError::new(
            "max_backoff_secs",
            "must not be smaller than seconds_between_retry",
        ));
    }

    if config.transport.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("transport.connect_timeout_secs", "must be greater than 0"));
    }

    if config.transport.write_timeout_secs == 0 {
        errors.push(ValidationError::new("transport.write_timeout_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
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
    fn test_valid_config() {
        let config = SinkConfig {
            endpoints: "a:1,b:2".into(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SinkConfig::default();
        config.transport.connect_timeout_secs = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["endpoints", "transport.connect_timeout_secs", "observability.metrics_address"]
        );
        assert_eq!(errors[0].to_string(), "endpoints: Must set 'endpoints'");
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        let config = SinkConfig {
            endpoints: "a:1,b:port".into(),
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("b:port"));
    }

    #[test]
    fn test_fixed_interval_above_backoff_cap() {
        let mut config = SinkConfig {
            endpoints: "a:1".into(),
            seconds_between_retry: 600,
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());

        config.backoff = BackoffStrategy::Exponential;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "max_backoff_secs");
    }
}
