//! Authentication middleware.
//! Resolves the caller from the bearer token.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::GatewayState;
use crate::observability::metrics;
use crate::security::token::{bearer_token, Caller};

pub async fn authentication_middleware(
    State(state): State<GatewayState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 1. No bearer credentials: continue as anonymous.
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned);

    let caller = match token {
        None => Caller::anonymous(),
        // 2. A token that fails verification is rejected outright.
        Some(token) => match state.verifier.verify(&token) {
            Ok(claims) => Caller::from_claims(claims),
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id(req.headers()),
                    error = %e,
                    "Rejected bearer token"
                );
                metrics::record_token_rejected();
                return response::invalid_token();
            }
        },
    };

    // 3. Attach context
    req.extensions_mut().insert(caller);
    next.run(req).await
}
