//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every rule pattern so malformed braces fail at startup
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Require a token signing key
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::routing::{PathPattern, PatternError, Requirement};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("no JWT signing key configured (set security.jwt_signing_key or GATEWAY_JWT_SIGNING_KEY)")]
    MissingSigningKey,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("rule #{0} has no paths")]
    EmptyRule(usize),

    #[error("rule #{0} requires any_of with an empty role list")]
    EmptyRoles(usize),

    #[error("rule #{index}: {source}")]
    Pattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    #[error("invalid HTTP method `{0}`")]
    Method(String),

    #[error("invalid CORS origin `{0}`")]
    CorsOrigin(String),

    #[error("invalid CORS header `{0}`")]
    CorsHeader(String),

    #[error("unknown log format `{0}` (expected \"pretty\" or \"json\")")]
    LogFormat(String),
}

/// Check the whole configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let has_key = config
        .security
        .jwt_signing_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !has_key {
        errors.push(ValidationError::MissingSigningKey);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (index, rule) in config.rules.iter().enumerate() {
        if rule.paths.is_empty() {
            errors.push(ValidationError::EmptyRule(index));
        }
        if matches!(&rule.requirement, Requirement::AnyOf(roles) if roles.is_empty()) {
            errors.push(ValidationError::EmptyRoles(index));
        }
        for path in &rule.paths {
            if let Err(source) = PathPattern::parse(path) {
                errors.push(ValidationError::Pattern { index, source });
            }
        }
        for method in &rule.methods {
            if parse_method(method).is_none() {
                errors.push(ValidationError::Method(method.clone()));
            }
        }
    }

    if config.cors.enabled {
        for origin in &config.cors.allowed_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                errors.push(ValidationError::CorsOrigin(origin.clone()));
            }
        }
        for method in &config.cors.allowed_methods {
            if parse_method(method).is_none() {
                errors.push(ValidationError::Method(method.clone()));
            }
        }
        for header in &config.cors.allowed_headers {
            if HeaderName::from_bytes(header.as_bytes()).is_err() {
                errors.push(ValidationError::CorsHeader(header.clone()));
            }
        }
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::LogFormat(observability.log_format.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a method name as written in config. Names are upper-cased first.
pub fn parse_method(name: &str) -> Option<Method> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes()).ok()
}
