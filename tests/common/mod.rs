//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use account_service::config::AppConfig;
use account_service::http::HttpServer;
use account_service::lifecycle::Shutdown;
use account_service::store::{SharedStore, SqliteAccountStore};
use axum::{
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Router over a fresh in-memory store, plus a handle on that store.
pub async fn test_app() -> (Router, SqliteAccountStore) {
    test_app_with(AppConfig::default()).await
}

pub async fn test_app_with(config: AppConfig) -> (Router, SqliteAccountStore) {
    let store = SqliteAccountStore::in_memory().await.unwrap();
    let shared: SharedStore = Arc::new(store.clone());
    (HttpServer::new(config, shared).router(), store)
}

/// Router over an arbitrary store implementation.
pub fn app_over(store: SharedStore) -> Router {
    HttpServer::new(AppConfig::default(), store).router()
}

/// A complete, valid account document.
pub fn account_payload(name: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "address": "123 Main St",
        "phone_number": "555-1234",
    })
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Drive one request through the router and decode the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

/// Start a real server on an ephemeral port.
pub async fn spawn_server() -> (SocketAddr, Shutdown) {
    let store = SqliteAccountStore::in_memory().await.unwrap();
    let shared: SharedStore = Arc::new(store);

    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, shared);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
