//! Default upstream.
//!
//! Forwarding to real services belongs to the surrounding runtime. Without an
//! upstream the gateway echoes what it would have forwarded.

use axum::{
    body::Body,
    http::Request,
    Json, Router,
};
use serde_json::{json, Value};

use crate::http::request::request_id;
use crate::security::token::Caller;

/// Router answering every request with a description of it.
pub fn echo_upstream() -> Router {
    Router::new().fallback(echo_handler)
}

async fn echo_handler(request: Request<Body>) -> Json<Value> {
    let caller = request.extensions().get::<Caller>();

    let mut roles: Vec<&str> = caller
        .map(|c| c.roles.iter().map(String::as_str).collect())
        .unwrap_or_default();
    roles.sort_unstable();

    Json(json!({
        "request_id": request_id(request.headers()),
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "caller": caller.and_then(|c| c.name.as_deref()),
        "roles": roles,
    }))
}
