//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → request.rs (request ID, request-scoped storage)
//!     → middleware/ (timing, authentication, access control)
//!     → upstream.rs (forward target; echo by default)
//!     → response.rs (401/403 rejections)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use request::{RequestScope, X_REQUEST_ID};
pub use server::{GatewayServer, GatewayState, ServerError};
