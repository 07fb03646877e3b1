//! Startup orchestration.
//!
//! Order: metrics exporter, then endpoint pool and transport, then the
//! initial connect. A bad endpoint list is fatal; an unreachable pool is not.

use std::net::SocketAddr;

use crate::config::SinkConfig;
use crate::error::ConfigurationError;
use crate::lifecycle::Shutdown;
use crate::net::TcpConnectionFactory;
use crate::observability::metrics;
use crate::resilience::FailureRecoveryLoop;
use crate::sink::FailoverSink;

/// Sink over TCP with bounded backoff recovery.
pub type TcpSink = FailoverSink<TcpConnectionFactory, FailureRecoveryLoop>;

/// Build the TCP sink described by `config`, tied to `shutdown`.
pub async fn start(config: &SinkConfig, shutdown: &Shutdown) -> Result<TcpSink, ConfigurationError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        max_retries = config.max_retries,
        seconds_between_retry = config.seconds_between_retry,
        backoff = ?config.backoff,
        "Configuration loaded"
    );

    let factory = TcpConnectionFactory::new(&config.transport);
    let recovery = FailureRecoveryLoop::from_config(config).with_shutdown(shutdown.subscribe());
    FailoverSink::activate(config, factory, recovery).await
}
