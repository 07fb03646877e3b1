//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! supervisor / recovery / sink produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (endpoint, attempt, index)
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
