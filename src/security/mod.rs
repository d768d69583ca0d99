//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight answered, origin checked)
//!     → token.rs (bearer token → Caller)
//!     → firewall.rs (non-normalized paths refused)
//!     → access_control.rs (ordered rules → Decision)
//!     → Pass to upstream
//! ```
//!
//! # Design Decisions
//! - Fail closed at startup: bad rules or a missing key stop the process
//! - Denial is a value (`Decision`), not an error
//! - Policy and verifier are immutable and lock-free

pub mod access_control;
pub mod cors;
pub mod firewall;
pub mod token;

pub use access_control::{AccessPolicy, Decision, PolicyError};
pub use cors::cors_layer;
pub use firewall::{check_path, PathRejection};
pub use token::{Caller, Claims, TokenError, TokenVerifier};
