//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Write failed:
//!     → recovery.rs (force disconnect, sweep the pool)
//!     → sweep failed: backoff.rs (delay), sweep again
//!     → budget spent or shutdown: Exhausted
//! ```
//!
//! # Design Decisions
//! - Recovery runs under the sink lock; two recoveries never overlap
//! - Sweeps continue from wherever the pool cursor stopped
//! - Backoff waits are cancellable through the shutdown broadcast

pub mod backoff;
pub mod recovery;

pub use recovery::{FailureRecoveryLoop, RecoveryOutcome, RecoveryPolicy, RecoveryState, RetryState, SingleSweep};
