//! API gateway access layer: route authorization, bearer token
//! verification, CORS and request timing on top of Axum.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use security::{AccessPolicy, Decision};
