//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SinkConfig (validated, immutable)
//!     → endpoint pool, recovery loop, transport
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields except `endpoints` have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use validation::{validate_config, ValidationError};
pub use schema::{BackoffStrategy, LogFormat, ObservabilityConfig, SinkConfig, TransportConfig};
