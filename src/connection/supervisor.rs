//! Single-connection supervisor.
//!
//! # Responsibilities
//! - Hold zero or one live connection
//! - Sweep the endpoint pool once per `connect()`
//! - Leave the pool cursor on the endpoint that accepted the connection
//!
//! All methods take `&mut self`; callers that share a supervisor wrap it
//! in one exclusive lock so connect/disconnect never interleave.

use crate::connection::{Connection, ConnectionFactory};
use crate::endpoint::{Endpoint, EndpointPool};
use crate::error::{SinkError, SinkResult};
use crate::observability::metrics;

struct LiveConnection<C> {
    endpoint: Endpoint,
    conn: C,
}

/// Owns the endpoint pool and the single live connection.
pub struct ConnectionSupervisor<F: ConnectionFactory> {
    pool: EndpointPool,
    factory: F,
    live: Option<LiveConnection<F::Connection>>,
}

impl<F: ConnectionFactory> ConnectionSupervisor<F> {
    /// Create a disconnected supervisor.
    pub fn new(pool: EndpointPool, factory: F) -> Self {
        Self {
            pool,
            factory,
            live: None,
        }
    }

    /// Ensure a live connection, trying each endpoint at most once.
    ///
    /// Returns true immediately if already connected. Otherwise starts at
    /// the pool cursor and rotates on every failure; returns false once the
    /// cursor is back at its starting point.
    pub async fn connect(&mut self) -> bool {
        if self.live.is_some() {
            return true;
        }

        let start = self.pool.index();
        loop {
            let endpoint = self.pool.current().clone();
            metrics::record_connect_attempt(&endpoint);

            match self.factory.open(&endpoint).await {
                Ok(conn) => {
                    tracing::info!(endpoint = %endpoint, index = self.pool.index(), "Connected");
                    metrics::record_connected(true);
                    self.live = Some(LiveConnection { endpoint, conn });
                    return true;
                }
                Err(e) => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "Connect failed, trying the next");
                }
            }

            self.pool.advance();
            if self.pool.cycled_back_to_start(start) {
                tracing::debug!(endpoints = self.pool.len(), "Connect failed, no more hosts to try");
                return false;
            }
        }
    }

    /// Close the live connection, if any. The pool cursor is left untouched.
    pub async fn force_disconnect(&mut self) {
        if let Some(live) = self.live.take() {
            tracing::debug!(endpoint = %live.endpoint, "Disconnecting");
            live.conn.close().await;
            metrics::record_connected(false);
        }
    }

    /// Write a record on the live connection.
    pub async fn write(&mut self, record: &[u8]) -> SinkResult<()> {
        let live = self.live.as_mut().ok_or(SinkError::NotConnected)?;
        live.conn.write(record).await?;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.live.is_some()
    }

    /// Endpoint of the live connection.
    pub fn connected_endpoint(&self) -> Option<&Endpoint> {
        self.live.as_ref().map(|live| &live.endpoint)
    }

    pub fn pool(&self) -> &EndpointPool {
        &self.pool
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: ConnectionFactory> std::fmt::Debug for ConnectionSupervisor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSupervisor")
            .field("pool", &self.pool)
            .field("connected_to", &self.connected_endpoint())
            .finish()
    }
}
