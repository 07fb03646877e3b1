//! Newline-delimited TCP transport.
//!
//! # Responsibilities
//! - Open a TCP stream to an endpoint within a deadline
//! - Write each record followed by `\n`
//! - Shut the stream down on close

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::TransportConfig;
use crate::connection::{Connection, ConnectionFactory};
use crate::endpoint::Endpoint;
use crate::error::{ConnectionError, WriteError};

/// Opens [`TcpConnection`]s.
#[derive(Debug)]
pub struct TcpConnectionFactory {
    connect_timeout: Duration,
    write_timeout: Duration,
    next_id: AtomicU64,
}

impl TcpConnectionFactory {
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for TcpConnectionFactory {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl ConnectionFactory for TcpConnectionFactory {
    type Connection = TcpConnection;

    async fn open(&self, endpoint: &Endpoint) -> Result<TcpConnection, ConnectionError> {
        let host = endpoint.host().trim_start_matches('[').trim_end_matches(']');
        let stream = match timeout(self.connect_timeout, TcpStream::connect((host, endpoint.port()))).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ConnectionError::Io {
                    endpoint: endpoint.clone(),
                    source,
                })
            }
            Err(_) => {
                return Err(ConnectionError::Timeout {
                    endpoint: endpoint.clone(),
                    secs: self.connect_timeout.as_secs(),
                })
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(endpoint = %endpoint, error = %e, "Failed to set TCP_NODELAY");
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(connection_id = id, endpoint = %endpoint, "TCP connection opened");

        Ok(TcpConnection {
            id,
            stream,
            write_timeout: self.write_timeout,
        })
    }
}

/// A live TCP stream to one endpoint.
#[derive(Debug)]
pub struct TcpConnection {
    id: u64,
    stream: TcpStream,
    write_timeout: Duration,
}

impl TcpConnection {
    pub fn id(&self) -> u64 {
        self.id
    }

    async fn write_record(&mut self, record: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(record).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await
    }
}

impl Connection for TcpConnection {
    async fn write(&mut self, record: &[u8]) -> Result<(), WriteError> {
        let deadline = self.write_timeout;
        match timeout(deadline, self.write_record(record)).await {
            Ok(result) => result.map_err(WriteError::from),
            Err(_) => Err(WriteError::Timeout(deadline.as_secs())),
        }
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(connection_id = self.id, error = %e, "Error shutting down TCP stream");
        }
        tracing::trace!(connection_id = self.id, "TCP connection closed");
    }
}
