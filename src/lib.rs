//! Failover record sink.
//!
//! Delivers records to one of several interchangeable endpoints, keeping a
//! single live connection and rotating through a shuffled endpoint list
//! when connections or writes fail.

pub mod config;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod sink;

pub use config::SinkConfig;
pub use connection::{Connection, ConnectionFactory, ConnectionSupervisor};
pub use endpoint::{Endpoint, EndpointPool};
pub use error::{ConfigurationError, ConnectionError, SinkError, WriteError};
pub use lifecycle::Shutdown;
pub use resilience::{FailureRecoveryLoop, RecoveryPolicy, SingleSweep};
pub use sink::{FailoverSink, SinkStatus};
