//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use gateway_guard::config::GatewayConfig;
use gateway_guard::http::GatewayServer;
use gateway_guard::lifecycle::Shutdown;
use gateway_guard::security::Claims;
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::net::TcpListener;

pub const SIGNING_KEY: &str = "integration-signing-key";

/// Default config with the test signing key.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.security.jwt_signing_key = Some(SIGNING_KEY.to_string());
    config
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(server: GatewayServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Sign a token the way the authorization server does.
pub fn sign_token(user: &str, authorities: &[&str]) -> String {
    let exp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() + 3600;
    let claims = Claims {
        user_name: Some(user.to_string()),
        authorities: authorities.iter().map(|a| a.to_string()).collect(),
        scope: vec!["read".into(), "write".into()],
        client_id: Some("frontendapp".into()),
        exp,
        ..Default::default()
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY.as_bytes()),
    )
    .unwrap()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
