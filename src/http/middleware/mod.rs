//! Request pipeline middleware.
//!
//! # Order (outermost first)
//! ```text
//! timing.rs          on_entry → ... → on_exit (outside CORS and timeout)
//!   authentication.rs  bearer token → Caller extension (401 on bad token)
//!     access_control.rs  path firewall (400) → AccessPolicy::evaluate → forward / 401 / 403
//! ```

pub mod access_control;
pub mod authentication;
pub mod timing;

pub use access_control::access_control_middleware;
pub use authentication::authentication_middleware;
pub use timing::timing_middleware;
