//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline produces:
//!     → timing.rs (one latency record per request)
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log event
//! - Timing never influences the response

pub mod logging;
pub mod metrics;
pub mod timing;

pub use timing::{Clock, ManualClock, MonotonicClock, TimingFilter, TimingPhase, TimingRecord};
