//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine, submitter, ledger client produce:
//!     → logging.rs (structured log events, operation-id spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr log stream
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
