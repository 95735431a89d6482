//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Controller and chain clients produce:
//!     → logging.rs (structured log events, one span per user action)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stderr
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
