//! End-to-end tests for the gateway pipeline over a real socket.

use std::collections::HashSet;

use gateway_guard::http::GatewayServer;
use reqwest::{header, Method, StatusCode};
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_route_table_status_codes() {
    let server = GatewayServer::new(common::test_config()).unwrap();
    let (addr, shutdown) = common::start_gateway(server).await;
    let client = common::client();

    let admin = common::sign_token("admin", &["ROLE_ADMIN", "ROLE_USER"]);
    let user = common::sign_token("andres", &["ROLE_USER"]);

    let cases: Vec<(Method, &str, Option<&str>, StatusCode)> = vec![
        (Method::POST, "/api/security/oauth/token", None, StatusCode::OK),
        (Method::GET, "/api/productos/listar", None, StatusCode::OK),
        (Method::GET, "/api/productos/ver/3", None, StatusCode::UNAUTHORIZED),
        (Method::GET, "/api/productos/ver/3", Some(&user), StatusCode::OK),
        (Method::GET, "/api/items/ver/3/cantidad/2", Some(&user), StatusCode::OK),
        (Method::POST, "/api/productos/crear", Some(&user), StatusCode::FORBIDDEN),
        (Method::POST, "/api/productos/crear", Some(&admin), StatusCode::OK),
        (Method::PUT, "/api/items/editar/9", Some(&user), StatusCode::FORBIDDEN),
        (Method::DELETE, "/api/usuarios/usuarios/9", Some(&admin), StatusCode::OK),
        (Method::GET, "/api/otro/recurso", None, StatusCode::UNAUTHORIZED),
        (Method::GET, "/api/otro/recurso", Some(&user), StatusCode::OK),
    ];

    for (method, path, token, expected) in cases {
        let mut request = client.request(method.clone(), format!("http://{}{}", addr, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.expect("gateway unreachable");
        assert_eq!(response.status(), expected, "{} {}", method, path);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_rejections_are_json() {
    let server = GatewayServer::new(common::test_config()).unwrap();
    let (addr, shutdown) = common::start_gateway(server).await;
    let client = common::client();

    let response = client
        .get(format!("http://{}/api/usuarios/usuarios/1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let guest = common::sign_token("guest", &["ROLE_GUEST"]);
    let response = client
        .delete(format!("http://{}/api/items/eliminar/1", addr))
        .bearer_auth(guest)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "access_denied");

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_normalized_paths_refused_before_policy() {
    let server = GatewayServer::new(common::test_config()).unwrap();
    let (addr, shutdown) = common::start_gateway(server).await;
    let client = common::client();
    let user = common::sign_token("andres", &["ROLE_USER"]);

    // The client resolves dot segments itself; `//` and `%2F` reach the gateway as written.
    for path in ["/api/productos//crear", "/api/productos%2Fcrear"] {
        let response = client
            .post(format!("http://{}{}", addr, path))
            .bearer_auth(&user)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "invalid_request", "{}", path);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_cors_preflight_without_token() {
    let server = GatewayServer::new(common::test_config()).unwrap();
    let (addr, shutdown) = common::start_gateway(server).await;

    let response = common::client()
        .request(Method::OPTIONS, format!("http://{}/api/productos/crear", addr))
        .header(header::ORIGIN, "http://localhost:4200")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:4200"
    );
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_identity() {
    let server = GatewayServer::new(common::test_config()).unwrap();
    let (addr, shutdown) = common::start_gateway(server).await;
    let client = common::client();

    let mut handles = Vec::new();
    for i in 0..200 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let id = format!("req-{}", i);
            let response = client
                .get(format!("http://{}/api/items/listar", addr))
                .header("x-request-id", &id)
                .send()
                .await
                .unwrap();
            assert_eq!(response.headers()["x-request-id"], id.as_str());
            let body: Value = response.json().await.unwrap();
            body["request_id"].as_str().unwrap().to_string()
        }));
    }

    let mut seen = HashSet::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let echoed = handle.await.unwrap();
        assert_eq!(echoed, format!("req-{}", i));
        assert!(seen.insert(echoed));
    }

    shutdown.trigger();
}
