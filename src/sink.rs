//! Record sink with endpoint failover.
//!
//! # Responsibilities
//! - Build the endpoint pool from configuration
//! - Serialize connect, write and recovery behind one lock
//! - Hand write failures to the recovery policy
//!
//! # Design Decisions
//! - A failing write is reported failed; the record is not replayed
//! - While exhausted every append fails without touching the network
//! - Appends made while disconnected (but not exhausted) run one sweep

use tokio::sync::Mutex;

use crate::config::SinkConfig;
use crate::connection::{ConnectionFactory, ConnectionSupervisor};
use crate::endpoint::{Endpoint, EndpointPool};
use crate::error::{ConfigurationError, SinkError, SinkResult};
use crate::observability::metrics;
use crate::resilience::recovery::{FailureRecoveryLoop, RecoveryOutcome, RecoveryPolicy};

struct SinkInner<F: ConnectionFactory, P> {
    supervisor: ConnectionSupervisor<F>,
    recovery: P,
}

/// Point-in-time view of the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkStatus {
    pub connected_to: Option<Endpoint>,
    pub pool_index: usize,
    pub pool_size: usize,
    pub exhausted: bool,
}

/// Delivers records to one endpoint at a time, failing over on errors.
pub struct FailoverSink<F: ConnectionFactory, P: RecoveryPolicy = FailureRecoveryLoop> {
    inner: Mutex<SinkInner<F, P>>,
}

impl<F: ConnectionFactory, P: RecoveryPolicy> FailoverSink<F, P> {
    /// Wire a sink from parts without connecting.
    pub fn new(pool: EndpointPool, factory: F, recovery: P) -> Self {
        Self {
            inner: Mutex::new(SinkInner {
                supervisor: ConnectionSupervisor::new(pool, factory),
                recovery,
            }),
        }
    }

    /// Build the pool from `config.endpoints` and make the first connection.
    ///
    /// An unusable endpoint list is fatal. An initial connect failure is
    /// only logged; later appends sweep the pool again.
    pub async fn activate(config: &SinkConfig, factory: F, recovery: P) -> Result<Self, ConfigurationError> {
        let pool = EndpointPool::parse(&config.endpoints).map_err(|e| {
            tracing::error!(error = %e, endpoints = %config.endpoints, "Error during activation");
            e
        })?;

        tracing::info!(
            endpoints = pool.len(),
            order = ?pool.endpoints().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Endpoint pool shuffled"
        );

        let sink = Self::new(pool, factory, recovery);
        if !sink.connect().await {
            tracing::warn!("No endpoint reachable at activation");
        }
        Ok(sink)
    }

    /// Sweep the pool once if not connected.
    pub async fn connect(&self) -> bool {
        self.inner.lock().await.supervisor.connect().await
    }

    /// Write one record.
    ///
    /// On a write failure the connection is dropped and the recovery policy
    /// runs before this returns; the error is still reported.
    pub async fn append(&self, record: &[u8]) -> SinkResult<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.recovery.is_exhausted() {
            metrics::record_append("rejected");
            return Err(SinkError::Exhausted);
        }

        if !inner.supervisor.connect().await {
            metrics::record_append("dropped");
            return Err(SinkError::NotConnected);
        }

        match inner.supervisor.write(record).await {
            Ok(()) => {
                metrics::record_append("written");
                Ok(())
            }
            Err(e) => {
                metrics::record_append("failed");
                tracing::warn!(
                    endpoint = ?inner.supervisor.connected_endpoint().map(ToString::to_string),
                    error = %e,
                    "Write failed, forcing reconnect"
                );
                match inner.recovery.recover(&mut inner.supervisor).await {
                    RecoveryOutcome::Reconnected => tracing::info!(
                        endpoint = ?inner.supervisor.connected_endpoint().map(ToString::to_string),
                        "Failed over"
                    ),
                    RecoveryOutcome::Disconnected => {}
                    RecoveryOutcome::Exhausted => tracing::error!("Sink exhausted, records will be rejected"),
                }
                Err(e)
            }
        }
    }

    /// Drop the live connection without moving the pool cursor.
    pub async fn force_disconnect(&self) {
        self.inner.lock().await.supervisor.force_disconnect().await;
    }

    /// Clear an exhausted retry budget so appends try again.
    pub async fn reset(&self) {
        self.inner.lock().await.recovery.reset();
    }

    pub async fn status(&self) -> SinkStatus {
        let inner = self.inner.lock().await;
        SinkStatus {
            connected_to: inner.supervisor.connected_endpoint().cloned(),
            pool_index: inner.supervisor.pool().index(),
            pool_size: inner.supervisor.pool().len(),
            exhausted: inner.recovery.is_exhausted(),
        }
    }
}

impl<F: ConnectionFactory, P: RecoveryPolicy> std::fmt::Debug for FailoverSink<F, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverSink").finish_non_exhaustive()
    }
}
