//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile config into the shared gateway components
//! - Wire up middleware (request ID, tracing, timing, CORS, timeout, auth, policy)
//! - Mount the upstream router behind the pipeline
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::middleware::{
    access_control_middleware, authentication_middleware, timing_middleware,
};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::upstream::echo_upstream;
use crate::observability::TimingFilter;
use crate::security::{cors_layer, AccessPolicy, PolicyError, TokenError, TokenVerifier};

/// Errors building the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("access policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("token verifier: {0}")]
    Token(#[from] TokenError),
}

/// Components shared by every request. Built once, never mutated.
#[derive(Clone)]
pub struct GatewayState {
    pub policy: Arc<AccessPolicy>,
    pub verifier: Arc<TokenVerifier>,
    pub timing: TimingFilter,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    config: GatewayConfig,
    state: GatewayState,
    upstream: Router,
}

impl GatewayServer {
    /// Create a new server. Fails if the rules or signing key are unusable.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let policy = Arc::new(AccessPolicy::from_config(&config.rules)?);
        let verifier = Arc::new(TokenVerifier::from_config(&config.security)?);

        tracing::info!(rules = policy.rules().len(), "Access policy compiled");

        let state = GatewayState {
            policy,
            verifier,
            timing: TimingFilter::default(),
        };

        Ok(Self {
            config,
            state,
            upstream: echo_upstream(),
        })
    }

    /// Replace the service requests are forwarded to once allowed.
    pub fn with_upstream(mut self, upstream: Router) -> Self {
        self.upstream = upstream;
        self
    }

    /// Replace the timing filter (e.g. to use a manual clock).
    pub fn with_timing(mut self, timing: TimingFilter) -> Self {
        self.state.timing = timing;
        self
    }

    pub fn state(&self) -> &GatewayState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let state = self.state.clone();

        let app = self
            .upstream
            .clone()
            .layer(from_fn_with_state(state.clone(), access_control_middleware))
            .layer(from_fn_with_state(state.clone(), authentication_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)));

        let app = if self.config.cors.enabled {
            app.layer(cors_layer(&self.config.cors))
        } else {
            app
        };

        // Timing wraps timeout and CORS so 408s and preflights are timed too.
        app.layer(from_fn_with_state(state, timing_middleware))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id(req.headers()),
                    method = %req.method(),
                    path = %req.uri().path(),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
