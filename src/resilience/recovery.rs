//! Recovery after a failed write.
//!
//! # States
//! - Idle: no recovery in progress
//! - Recovering: connection dropped, sweeping the pool
//! - Exhausted: retry budget spent, stays disconnected until `reset()`
//!
//! # State Transitions
//! ```text
//! Idle → Recovering: write failed
//! Recovering → Idle: a sweep connected
//! Recovering → Recovering: sweep failed, attempts < max, wait backoff
//! Recovering → Exhausted: sweep failed, attempts == max
//! Recovering → Exhausted: shutdown while waiting
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::{BackoffStrategy, SinkConfig};
use crate::connection::{ConnectionFactory, ConnectionSupervisor};
use crate::observability::metrics;
use crate::resilience::backoff::sweep_delay;

/// Result of one recovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// A new connection is live; the next write can succeed.
    Reconnected,
    /// No endpoint answered, but later writes may try again.
    Disconnected,
    /// No endpoint answered and no retries are left.
    Exhausted,
}

/// Recovery state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    Idle,
    Recovering,
    Exhausted,
}

/// What to do with the supervisor after a write has failed.
pub trait RecoveryPolicy: Send {
    fn recover<F: ConnectionFactory>(
        &mut self,
        supervisor: &mut ConnectionSupervisor<F>,
    ) -> impl Future<Output = RecoveryOutcome> + Send;

    /// True once the policy refuses to try again.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Forget an exhausted budget (operator reconfiguration).
    fn reset(&mut self) {}
}

/// Reconnect with one sweep over the pool and never back off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleSweep;

impl RecoveryPolicy for SingleSweep {
    async fn recover<F: ConnectionFactory>(&mut self, supervisor: &mut ConnectionSupervisor<F>) -> RecoveryOutcome {
        supervisor.force_disconnect().await;
        if supervisor.connect().await {
            metrics::record_failover();
            RecoveryOutcome::Reconnected
        } else {
            tracing::warn!("Reconnect failed, no endpoint reachable");
            RecoveryOutcome::Disconnected
        }
    }
}

/// Counts failed full-pool sweeps within one outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub max_attempts: u32,
    pub interval_secs: u64,
}

impl RetryState {
    pub fn new(max_attempts: u32, interval_secs: u64) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            interval_secs,
        }
    }

    pub fn budget_spent(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

/// Bounded backoff across repeated full-pool sweeps.
///
/// The sweep counter restarts at zero after every successful reconnect.
/// Exhaustion is terminal until [`RecoveryPolicy::reset`].
#[derive(Debug)]
pub struct FailureRecoveryLoop {
    retry: RetryState,
    strategy: BackoffStrategy,
    max_backoff_secs: u64,
    state: RecoveryState,
    shutdown: Option<broadcast::Receiver<()>>,
}

impl FailureRecoveryLoop {
    /// Fixed-interval loop with at most `max_retries` extra sweeps.
    pub fn new(max_retries: u32, seconds_between_retry: u64) -> Self {
        Self {
            retry: RetryState::new(max_retries, seconds_between_retry),
            strategy: BackoffStrategy::Fixed,
            max_backoff_secs: seconds_between_retry,
            state: RecoveryState::Idle,
            shutdown: None,
        }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self {
            strategy: config.backoff,
            max_backoff_secs: config.max_backoff_secs,
            ..Self::new(config.max_retries, config.seconds_between_retry)
        }
    }

    /// Interrupt backoff waits when the shutdown signal fires.
    pub fn with_shutdown(mut self, shutdown: broadcast::Receiver<()>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn state(&self) -> RecoveryState {
        self.state
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry
    }

    fn exhaust(&mut self) -> RecoveryOutcome {
        self.state = RecoveryState::Exhausted;
        metrics::record_exhausted();
        RecoveryOutcome::Exhausted
    }

    /// Sleep for `delay`; false if shutdown arrived first.
    async fn backoff(&mut self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = shutdown_signal(self.shutdown.as_mut()) => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

impl RecoveryPolicy for FailureRecoveryLoop {
    async fn recover<F: ConnectionFactory>(&mut self, supervisor: &mut ConnectionSupervisor<F>) -> RecoveryOutcome {
        if self.state == RecoveryState::Exhausted {
            return RecoveryOutcome::Exhausted;
        }

        self.state = RecoveryState::Recovering;
        supervisor.force_disconnect().await;

        loop {
            if supervisor.connect().await {
                if self.retry.attempts > 0 {
                    tracing::info!(sweeps = self.retry.attempts, "Recovered after backoff");
                }
                self.retry.attempts = 0;
                self.state = RecoveryState::Idle;
                metrics::record_failover();
                return RecoveryOutcome::Reconnected;
            }

            if self.retry.budget_spent() {
                tracing::error!(
                    max_retries = self.retry.max_attempts,
                    endpoints = supervisor.pool().len(),
                    "All endpoints failed, giving up"
                );
                return self.exhaust();
            }

            self.retry.attempts += 1;
            let delay = sweep_delay(self.strategy, self.retry.attempts, self.retry.interval_secs, self.max_backoff_secs);
            tracing::warn!(
                attempt = self.retry.attempts,
                max_retries = self.retry.max_attempts,
                delay = ?delay,
                "All endpoints failed, retrying after backoff"
            );

            if !self.backoff(delay).await {
                tracing::warn!(attempt = self.retry.attempts, "Shutdown during backoff, giving up");
                return self.exhaust();
            }
            metrics::record_recovery_sweep();
        }
    }

    fn is_exhausted(&self) -> bool {
        self.state == RecoveryState::Exhausted
    }

    fn reset(&mut self) {
        tracing::info!("Retry budget reset");
        self.retry.attempts = 0;
        self.state = RecoveryState::Idle;
    }
}

/// Resolves when shutdown is signalled; never resolves without a receiver
/// or once the sender is gone.
async fn shutdown_signal(shutdown: Option<&mut broadcast::Receiver<()>>) {
    if let Some(rx) = shutdown {
        match rx.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => return,
            Err(broadcast::error::RecvError::Closed) => {}
        }
    }
    std::future::pending::<()>().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_state_budget() {
        let mut retry = RetryState::new(2, 10);
        assert!(!retry.budget_spent());
        retry.attempts = 2;
        assert!(retry.budget_spent());

        assert!(RetryState::new(0, 10).budget_spent());
    }

    #[test]
    fn test_from_config() {
        let mut config = SinkConfig::default();
        config.max_retries = 4;
        config.seconds_between_retry = 3;
        config.backoff = BackoffStrategy::Exponential;

        let recovery = FailureRecoveryLoop::from_config(&config);
        assert_eq!(recovery.retry_state(), RetryState::new(4, 3));
        assert_eq!(recovery.strategy, BackoffStrategy::Exponential);
        assert_eq!(recovery.state(), RecoveryState::Idle);
    }

    #[test]
    fn test_reset_leaves_exhausted() {
        let mut recovery = FailureRecoveryLoop::new(1, 0);
        recovery.retry.attempts = 1;
        recovery.exhaust();
        assert!(recovery.is_exhausted());

        recovery.reset();
        assert!(!recovery.is_exhausted());
        assert_eq!(recovery.retry_state().attempts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_interrupted_by_shutdown() {
        let (tx, rx) = broadcast::channel(1);
        let mut recovery = FailureRecoveryLoop::new(3, 60).with_shutdown(rx);
        tx.send(()).unwrap();
        assert!(!recovery.backoff(Duration::from_secs(60)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_ignores_dropped_sender() {
        let (tx, rx) = broadcast::channel::<()>(1);
        let mut recovery = FailureRecoveryLoop::new(3, 5).with_shutdown(rx);
        drop(tx);
        let start = tokio::time::Instant::now();
        assert!(recovery.backoff(Duration::from_secs(5)).await);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
