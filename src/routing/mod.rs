//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → rule.rs (ordered RouteRule table)
//!     → matcher.rs (method set + segment pattern)
//!     → Return: first matching rule or NoMatch
//!
//! Rule Compilation (at startup):
//!     RuleConfig[]
//!     → expand one rule per path, in declaration order
//!     → compile path patterns (fail fast on malformed braces)
//!     → Freeze as immutable AccessPolicy
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same rule
//! - First match wins (declaration order, not best match)

pub mod matcher;
pub mod rule;

pub use matcher::{Matcher, MethodSet, PathPattern, PatternError};
pub use rule::{Requirement, RouteRule};
