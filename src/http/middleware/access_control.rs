//! Access Control Middleware.
//! Refuses non-normalized paths, then enforces the route access policy.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::GatewayState;
use crate::observability::metrics;
use crate::security::firewall::check_path;
use crate::security::token::Caller;

pub async fn access_control_middleware(
    State(state): State<GatewayState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // 1. The policy only sees paths the upstream cannot resolve differently.
    if let Err(rejection) = check_path(req.uri().path()) {
        tracing::warn!(
            request_id = %request_id(req.headers()),
            method = %req.method(),
            path = %req.uri().path(),
            reason = %rejection,
            "Request path refused"
        );
        metrics::record_path_rejected();
        return response::bad_request(&rejection.to_string());
    }

    // 2. Evaluate
    let anonymous = Caller::anonymous();
    let caller = req.extensions().get::<Caller>().unwrap_or(&anonymous);

    let decision = state.policy.evaluate(
        req.method(),
        req.uri().path(),
        &caller.roles,
        caller.authenticated,
    );
    metrics::record_decision(decision.as_str());

    // 3. Forward or reject
    match response::rejection(decision) {
        None => next.run(req).await,
        Some(rejection) => {
            tracing::info!(
                request_id = %request_id(req.headers()),
                method = %req.method(),
                path = %req.uri().path(),
                caller = caller.name.as_deref().unwrap_or("anonymous"),
                decision = %decision,
                "Request rejected by access policy"
            );
            rejection
        }
    }
}
