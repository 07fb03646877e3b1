//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build endpoint pool → Wire sink → Initial connect
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Interrupt backoff → Close connection → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - A failed initial connect is not fatal; appends keep sweeping
//! - Shutdown turns any in-progress backoff into exhaustion

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
