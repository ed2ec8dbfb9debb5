//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, pretty or JSON)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout log collection
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every capacity search carries a run ID span; every API call a request ID
//! - Metrics are cheap and disabled by default

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
