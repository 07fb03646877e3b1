//! Error types shared across the sink.
//!
//! Only `ConfigurationError` and `SinkError` ever reach a caller.
//! `ConnectionError` is absorbed by endpoint rotation and `WriteError`
//! is wrapped into `SinkError::Write` after recovery has run.

use thiserror::Error;

use crate::endpoint::Endpoint;

/// The endpoint list could not be turned into a pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No endpoints were configured.
    #[error("Must set 'endpoints'")]
    Empty,

    /// An entry is not of the form `host:port`.
    #[error("Malformed endpoint '{0}', expected host:port")]
    Malformed(String),

    /// The port part of an entry is not a valid TCP port.
    #[error("Invalid port in endpoint '{0}'")]
    InvalidPort(String),
}

/// Opening a connection to a single endpoint failed.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to connect to {endpoint}: {source}")]
    Io {
        endpoint: Endpoint,
        #[source]
        source: std::io::Error,
    },

    #[error("Connect to {endpoint} timed out after {secs} seconds")]
    Timeout { endpoint: Endpoint, secs: u64 },

    /// Refused by the factory for a reason it does not expose.
    #[error("Connection to {endpoint} refused: {reason}")]
    Refused { endpoint: Endpoint, reason: String },
}

/// Writing a record on a live connection failed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Write timed out after {0} seconds")]
    Timeout(u64),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Errors reported to callers of the sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// There is no live connection to write to.
    #[error("Not connected to any endpoint")]
    NotConnected,

    /// The write failed; recovery has already been attempted.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Every endpoint failed for the whole retry budget.
    #[error("All endpoints exhausted, sink is disconnected")]
    Exhausted,
}

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::Malformed("nohost".into());
        assert_eq!(err.to_string(), "Malformed endpoint 'nohost', expected host:port");

        let err = ConnectionError::Timeout {
            endpoint: Endpoint::new("redis-a", 6379),
            secs: 5,
        };
        assert_eq!(err.to_string(), "Connect to redis-a:6379 timed out after 5 seconds");
    }

    #[test]
    fn test_write_error_is_transparent() {
        let err = SinkError::from(WriteError::Rejected("broken pipe".into()));
        assert_eq!(err.to_string(), "Write rejected: broken pipe");
    }
}
