//! Logging and metrics.
//!
//! # Data Flow
//! ```text
//! handlers, store, chain client
//!     → logging.rs (tracing subscriber: plain or JSON lines on stdout)
//!     → metrics.rs (charity_* counters and histograms)
//!         → Prometheus exporter on observability.metrics_address
//! ```
//!
//! Every HTTP span carries the request's `x-request-id`.

pub mod logging;
pub mod metrics;
