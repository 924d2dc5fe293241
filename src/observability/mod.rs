//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (request counters, latency histogram, in-flight gauge)
//!
//! Consumers:
//!     → stdout log aggregation
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `tower_http::trace::TraceLayer` opens one span per request
//! - Request id flows in the `x-request-id` header
//! - Metrics go through the `metrics` facade; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
