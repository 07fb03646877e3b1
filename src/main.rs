//! failover-sink
//!
//! Reads records (one per line) from stdin and delivers them to the first
//! reachable endpoint of a shuffled `host:port` list, failing over when a
//! connection or a write breaks.
//!
//! ```text
//!  stdin ──▶ FailoverSink ──▶ ConnectionSupervisor ──▶ endpoint[index]
//!                │                     ▲
//!                │ write failed        │ sweep pool
//!                ▼                     │
//!        FailureRecoveryLoop ──────────┘ (backoff between sweeps)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use failover_sink::config::{read_config, validate_config, ConfigError, SinkConfig};
use failover_sink::lifecycle::{signals, startup, Shutdown};
use failover_sink::observability::logging;
use failover_sink::SinkError;

#[derive(Parser)]
#[command(name = "failover-sink")]
#[command(about = "Pipe stdin lines to the first reachable endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma separated host:port list, overrides the file.
    #[arg(short, long)]
    endpoints: Option<String>,

    /// Backoff sweeps after a failed reconnect.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Seconds between backoff sweeps.
    #[arg(long)]
    seconds_between_retry: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<SinkConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => SinkConfig::default(),
        };
        if let Some(endpoints) = self.endpoints {
            config.endpoints = endpoints;
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(secs) = self.seconds_between_retry {
            config.seconds_between_retry = secs;
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init_logging(&config.observability);

    tracing::info!("failover-sink v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(Shutdown::new());
    let sink = startup::start(&config, &shutdown).await?;

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_on_signal(&signal_shutdown).await;
    });

    let mut stop = shutdown.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut written: u64 = 0;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match sink.append(line.as_bytes()).await {
                    Ok(()) => written += 1,
                    Err(SinkError::Exhausted) => {
                        tracing::error!("All endpoints exhausted, stopping");
                        break;
                    }
                    Err(e) => tracing::warn!(error = %e, "Record dropped"),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read stdin");
                    break;
                }
            },
            _ = stop.recv() => break,
        }
    }

    sink.force_disconnect().await;
    tracing::info!(records = written, "Shutdown complete");
    Ok(())
}
