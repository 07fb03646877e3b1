//! Connection subsystem.
//!
//! # Data Flow
//! ```text
//! connect():
//!     supervisor.rs (remember start index)
//!     → ConnectionFactory::open(pool.current())
//!     → on failure: pool.advance(), stop after one full sweep
//!     → on success: hold the single live Connection
//!
//! write(record):
//!     supervisor.rs → Connection::write (no implicit connect)
//! ```
//!
//! # Design Decisions
//! - At most one live connection per supervisor
//! - Transport is pluggable through `ConnectionFactory`
//! - Single-endpoint connect errors never leave this module

pub mod supervisor;

pub use supervisor::ConnectionSupervisor;

use std::future::Future;

use crate::endpoint::Endpoint;
use crate::error::{ConnectionError, WriteError};

/// An open transport-level connection to one endpoint.
pub trait Connection: Send {
    /// Write one opaque record.
    fn write(&mut self, record: &[u8]) -> impl Future<Output = Result<(), WriteError>> + Send;

    /// Release the connection. Errors while closing are swallowed.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opens connections to endpoints chosen by the supervisor.
pub trait ConnectionFactory: Send + Sync {
    type Connection: Connection;

    fn open(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<Self::Connection, ConnectionError>> + Send;
}
