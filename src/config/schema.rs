//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for the failover sink.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Comma separated `host:port` pairs (required).
    pub endpoints: String,

    /// Maximum number of backoff sweeps after a failed reconnect.
    #[serde(alias = "maxRetries")]
    pub max_retries: u32,

    /// Delay between sweeps in seconds.
    #[serde(alias = "secondsBetweenRetry")]
    pub seconds_between_retry: u64,

    /// How the delay between sweeps evolves.
    pub backoff: BackoffStrategy,

    /// Upper bound for exponential backoff in seconds.
    pub max_backoff_secs: u64,

    /// TCP transport settings.
    pub transport: TransportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            endpoints: String::new(),
            max_retries: 10,
            seconds_between_retry: 10,
            backoff: BackoffStrategy::Fixed,
            max_backoff_secs: 300,
            transport: TransportConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Delay strategy between full-pool sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Same delay before every sweep.
    #[default]
    Fixed,
    /// Doubling delay with jitter, capped at `max_backoff_secs`.
    Exponential,
}

/// TCP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Per-record write timeout in seconds.
    pub write_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            write_timeout_secs: 5,
        }
    }
}

/// Log output format.
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
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
