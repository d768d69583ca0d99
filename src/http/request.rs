//! Request identity and request-scoped storage.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Read the request ID back out of the headers
//! - Provide a per-request attribute store for filters
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `RequestScope` is owned by one request's middleware frame and is never
//!   shared, so filters need no locking

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use axum::http::{HeaderMap, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns a UUID request ID when none is present.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID.clone())
}

/// Request ID from the headers, or "unknown".
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Attribute store bound to a single request.
pub struct RequestScope {
    request_id: String,
    attributes: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl RequestScope {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Store a value, replacing any previous value under `key`.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: &'static str, value: T) {
        self.attributes.insert(key, Box::new(value));
    }

    /// Borrow the value under `key` if it has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.attributes.get(key)?.downcast_ref()
    }
}

impl fmt::Debug for RequestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScope")
            .field("request_id", &self.request_id)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}
