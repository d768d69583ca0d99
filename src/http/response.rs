//! Rejection responses.
//!
//! # Responsibilities
//! - Map policy decisions to HTTP status codes
//! - 400 for request paths the firewall refuses
//! - Render OAuth2-style JSON error bodies
//!
//! # Design Decisions
//! - 401 responses always carry `WWW-Authenticate: Bearer`
//! - Bodies never echo token contents

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::security::Decision;

/// JSON body of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_description: String,
}

fn error_response(
    status: StatusCode,
    error: &str,
    description: &str,
    challenge: Option<HeaderValue>,
) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        error_description: description.to_string(),
    };
    let mut response = (status, Json(body)).into_response();
    if let Some(challenge) = challenge {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, challenge);
    }
    response
}

/// 401 for a request that needs a token but sent none.
pub fn unauthorized() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "Full authentication is required to access this resource",
        Some(HeaderValue::from_static(r#"Bearer realm="gateway""#)),
    )
}

/// 401 for a bearer token that failed verification.
pub fn invalid_token() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "invalid_token",
        "Access token is invalid or expired",
        Some(HeaderValue::from_static(
            r#"Bearer realm="gateway", error="invalid_token""#,
        )),
    )
}

/// 403 for an authenticated caller lacking the required role.
pub fn access_denied() -> Response {
    error_response(StatusCode::FORBIDDEN, "access_denied", "Access is denied", None)
}

/// 400 for a request path that is not in normal form.
pub fn bad_request(reason: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "invalid_request", reason, None)
}

/// Rejection for a decision, or `None` when the request may proceed.
pub fn rejection(decision: Decision) -> Option<Response> {
    match decision {
        Decision::Allow => None,
        Decision::RequiresAuth => Some(unauthorized()),
        Decision::Deny => Some(access_denied()),
    }
}
