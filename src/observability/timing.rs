//! Request timing filter.
//!
//! # State Transitions
//! ```text
//! (none) → Pending:    on_entry records the start timestamp
//! Pending → Completed: on_exit computes elapsed time and logs it once
//! ```
//!
//! # Design Decisions
//! - State lives in the request's own `RequestScope`, never in the filter
//! - A missing start marker is a warning, never a panic or request error
//! - Completed is terminal: repeated hooks are ignored with a warning

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::http::request::RequestScope;
use crate::observability::metrics;

const TIMING_KEY: &str = "timing";

/// Source of millisecond timestamps.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_millis(&self) -> u64;
}

/// Monotonic clock measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Per-request timing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingPhase {
    Pending { start_millis: u64 },
    Completed { elapsed_millis: u64 },
}

/// Result of one timed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRecord {
    pub request_id: String,
    pub start_millis: u64,
    pub end_millis: u64,
    pub elapsed_millis: u64,
}

impl TimingRecord {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_millis as f64 / 1000.0
    }
}

/// Measures wall-clock time between request entry and response exit.
#[derive(Debug, Clone)]
pub struct TimingFilter {
    clock: Arc<dyn Clock>,
}

impl Default for TimingFilter {
    fn default() -> Self {
        Self::new(Arc::new(MonotonicClock::new()))
    }
}

impl TimingFilter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Record the start timestamp for this request.
    pub fn on_entry(&self, scope: &mut RequestScope) {
        match Self::phase(scope) {
            None => {
                let start_millis = self.clock.now_millis();
                scope.insert(TIMING_KEY, TimingPhase::Pending { start_millis });
            }
            Some(TimingPhase::Pending { .. }) => {
                tracing::debug!(request_id = %scope.request_id(), "Timing already started");
            }
            Some(TimingPhase::Completed { .. }) => {
                tracing::warn!(request_id = %scope.request_id(), "Timing entry after completion ignored");
            }
        }
    }

    /// Compute and log the elapsed time. Returns `None` when no start marker
    /// is pending.
    pub fn on_exit(&self, scope: &mut RequestScope) -> Option<TimingRecord> {
        let start_millis = match Self::phase(scope) {
            Some(TimingPhase::Pending { start_millis }) => start_millis,
            Some(TimingPhase::Completed { .. }) => {
                tracing::warn!(request_id = %scope.request_id(), "Timing already completed, not logging again");
                return None;
            }
            None => {
                tracing::warn!(
                    request_id = %scope.request_id(),
                    elapsed_ms = 0u64,
                    "No start marker for request, elapsed time unknown"
                );
                return None;
            }
        };

        let end_millis = self.clock.now_millis();
        let elapsed_millis = end_millis.saturating_sub(start_millis);
        scope.insert(TIMING_KEY, TimingPhase::Completed { elapsed_millis });

        let record = TimingRecord {
            request_id: scope.request_id().to_string(),
            start_millis,
            end_millis,
            elapsed_millis,
        };

        tracing::info!(
            request_id = %record.request_id,
            elapsed_secs = record.elapsed_secs(),
            elapsed_ms = record.elapsed_millis,
            "Request completed"
        );
        metrics::record_request_duration(record.elapsed_secs());

        Some(record)
    }

    /// Current timing state of a request, if any.
    pub fn phase(scope: &RequestScope) -> Option<TimingPhase> {
        scope.get::<TimingPhase>(TIMING_KEY).copied()
    }
}
