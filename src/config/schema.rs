//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::Requirement;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Token verification settings.
    pub security: SecurityConfig,

    /// Cross-origin resource sharing policy.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Ordered access rules. First match wins.
    pub rules: Vec<RuleConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            security: SecurityConfig::default(),
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            rules: default_rules(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8090").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8090".to_string(),
        }
    }
}

/// Token verification configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared HMAC key the authorization server signs tokens with.
    /// Overridden by `GATEWAY_JWT_SIGNING_KEY`.
    pub jwt_signing_key: Option<String>,

    /// Clock skew tolerated when checking `exp`, in seconds.
    pub leeway_secs: u64,
}

/// CORS policy applied to every route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,

    /// Allowed origins; `*` allows any.
    pub allowed_origins: Vec<String>,

    pub allowed_methods: Vec<String>,

    pub allowed_headers: Vec<String>,

    pub allow_credentials: bool,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["POST", "GET", "PUT", "DELETE", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_headers: vec!["Authorization".to_string(), "Content-Type".to_string()],
            allow_credentials: true,
            max_age_secs: 1800,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9091".to_string(),
        }
    }
}

/// One access clause as written in the config file.
///
/// Several paths may share a clause; they expand into one rule each, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// HTTP methods; empty applies to all.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Path patterns, e.g. `/api/items/ver/{id}`.
    pub paths: Vec<String>,

    pub requirement: Requirement,
}

impl RuleConfig {
    fn new(methods: &[&str], paths: &[&str], requirement: Requirement) -> Self {
        Self {
            methods: methods.iter().map(|m| m.to_string()).collect(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            requirement,
        }
    }
}

/// The rule table the gateway ships with.
pub fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig::new(&[], &["/api/security/oauth/token"], Requirement::Public),
        RuleConfig::new(
            &["GET"],
            &["/api/productos/listar", "/api/items/listar", "/api/usuarios/usuarios"],
            Requirement::Public,
        ),
        RuleConfig::new(
            &["GET"],
            &[
                "/api/productos/ver/{id}",
                "/api/items/ver/{id}/cantidad/{cantidad}",
                "/api/usuarios/usuarios/{id}",
            ],
            Requirement::any_of(["ADMIN", "USER"]),
        ),
        RuleConfig::new(
            &["POST"],
            &["/api/productos/crear", "/api/items/crear", "/api/usuarios/usuarios"],
            Requirement::role("ADMIN"),
        ),
        RuleConfig::new(
            &["PUT"],
            &[
                "/api/productos/editar/{id}",
                "/api/items/editar/{id}",
                "/api/usuarios/usuarios/{id}",
            ],
            Requirement::role("ADMIN"),
        ),
        RuleConfig::new(
            &["DELETE"],
            &[
                "/api/productos/eliminar/{id}",
                "/api/items/eliminar/{id}",
                "/api/usuarios/usuarios/{id}",
            ],
            Requirement::role("ADMIN"),
        ),
    ]
}
