//! Network transports.
//!
//! The sink core only sees `ConnectionFactory` and `Connection`; this
//! module provides the stock TCP implementation used by the binary.

pub mod tcp;

pub use tcp::{TcpConnection, TcpConnectionFactory};
