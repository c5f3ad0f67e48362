//! A tiny API to point `circuit-gate` at.
//!
//! ```text
//! cargo run --example mock_api
//! cargo run -- --login demo --password demo
//! ```
//!
//! Stop and restart this server while the poller runs to watch the gate
//! block and recover.

use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;

const TOKEN: &str = "demo-token";

async fn authenticate(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["login"] == "demo" && body["password"] == "demo" {
        (StatusCode::OK, Json(json!({ "token": TOKEN })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "invalid credentials" })),
        )
    }
}

async fn projects(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let expected = format!("JWT {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => (
            StatusCode::OK,
            Json(json!([
                { "id": 1, "name": "gatekeeper" },
                { "id": 2, "name": "lighthouse" }
            ])),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "missing or invalid token" })),
        ),
    }
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/v1/authenticate", post(authenticate))
        .route("/v1/projects/", get(projects));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("Mock API listening on http://{}/v1", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
