//! Timing middleware: runs the timing filter around the rest of the pipeline.
//!
//! The record is completed when the guard drops, so a request whose future
//! is cancelled (client disconnect) is still timed once.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::{request_id, RequestScope};
use crate::http::server::GatewayState;
use crate::observability::{TimingFilter, TimingPhase};

/// Owns one request's scope and finishes its timing on drop.
struct TimingGuard {
    filter: TimingFilter,
    scope: RequestScope,
}

impl TimingGuard {
    fn start(filter: TimingFilter, request_id: String) -> Self {
        let mut scope = RequestScope::new(request_id);
        filter.on_entry(&mut scope);
        Self { filter, scope }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if let Some(TimingPhase::Pending { .. }) = TimingFilter::phase(&self.scope) {
            self.filter.on_exit(&mut self.scope);
        }
    }
}

pub async fn timing_middleware(
    State(state): State<GatewayState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let guard = TimingGuard::start(state.timing.clone(), request_id(request.headers()));
    let response = next.run(request).await;
    drop(guard);

    response
}
