//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! adapter + gateway produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured filter
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
