//! Delay between unsuccessful full-pool sweeps.

use std::time::Duration;
use rand::Rng;

use crate::config::BackoffStrategy;

/// Delay before sweep number `attempt` (1-based) of a recovery episode.
///
/// `Fixed` waits `interval_secs` every time. `Exponential` doubles from
/// `interval_secs`, caps at `max_secs`, and adds up to 10% jitter.
pub fn sweep_delay(strategy: BackoffStrategy, attempt: u32, interval_secs: u64, max_secs: u64) -> Duration {
    match strategy {
        BackoffStrategy::Fixed => Duration::from_secs(interval_secs),
        BackoffStrategy::Exponential => {
            calculate_backoff(attempt, interval_secs.saturating_mul(1000), max_secs.saturating_mul(1000))
        }
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay.saturating_add(jitter))
}
