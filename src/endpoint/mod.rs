//! Endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! "host1:port1,host2:port2,..." (config)
//!     → Endpoint::parse (per entry)
//!     → pool.rs (shuffle once, keep rotation cursor)
//!     → connection supervisor reads current() / advance()
//! ```
//!
//! # Design Decisions
//! - Endpoints are immutable once parsed
//! - One malformed entry invalidates the whole list
//! - The shuffle happens once per pool, never per sweep

pub mod pool;

pub use pool::EndpointPool;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// A single `(host, port)` destination candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = ConfigurationError;

    /// Parse a single `host:port` entry.
    ///
    /// The port is taken after the last `:` so bracketed IPv6 hosts
    /// (`[::1]:6379`) parse as well.
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let entry = entry.trim();
        let (host, port) = entry
            .rsplit_once(':')
            .ok_or_else(|| ConfigurationError::Malformed(entry.to_string()))?;

        if host.is_empty() {
            return Err(ConfigurationError::Malformed(entry.to_string()));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| ConfigurationError::InvalidPort(entry.to_string()))?;

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        let ep: Endpoint = "redis-a:6379".parse().unwrap();
        assert_eq!(ep.host(), "redis-a");
        assert_eq!(ep.port(), 6379);
        assert_eq!(ep.to_string(), "redis-a:6379");

        let ep: Endpoint = "  10.0.0.7:7000 ".parse().unwrap();
        assert_eq!(ep, Endpoint::new("10.0.0.7", 7000));

        let ep: Endpoint = "[::1]:6380".parse().unwrap();
        assert_eq!(ep.host(), "[::1]");
        assert_eq!(ep.port(), 6380);
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(
            "localhost".parse::<Endpoint>(),
            Err(ConfigurationError::Malformed("localhost".into()))
        );
        assert_eq!(
            ":6379".parse::<Endpoint>(),
            Err(ConfigurationError::Malformed(":6379".into()))
        );
        assert_eq!(
            "localhost:redis".parse::<Endpoint>(),
            Err(ConfigurationError::InvalidPort("localhost:redis".into()))
        );
        assert_eq!(
            "localhost:70000".parse::<Endpoint>(),
            Err(ConfigurationError::InvalidPort("localhost:70000".into()))
        );
        assert!("localhost:".parse::<Endpoint>().is_err());
    }
}
