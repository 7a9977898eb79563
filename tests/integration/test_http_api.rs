//! Integration tests for the searchgate REST surface
//!
//! Drives the complete workflow through the router: JSON-RPC tool
//! calls, session status, deletion, and the health endpoint.

use crate::common::helpers::{test_services, FakeGateway};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use searchgate::http::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt as TowerServiceExt;

fn create_test_app() -> (Router, Arc<FakeGateway>) {
    let (services, gateway) = test_services();
    let app = router(AppState::new(services));
    (app, gateway)
}

async fn post_rpc(app: &Router, session_id: &str, body: Value) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/mcp/{session_id}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    // Tool failures ride in a normal JSON-RPC response
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 100_000)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn tool_call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["active_sessions"], 0);
}

#[tokio::test]
async fn test_end_to_end_gate_flow() {
    let (app, gateway) = create_test_app();

    // 1. Search before authenticating is refused without touching the
    //    provider
    let refused = post_rpc(&app, "s1", tool_call(1, "web_search", json!({"query": "rust"}))).await;
    assert_eq!(refused["error"]["code"], -32001);
    assert_eq!(gateway.call_count(), 0);

    // 2. Authenticate
    let auth = post_rpc(&app, "s1", tool_call(2, "authenticate", json!({}))).await;
    assert!(auth.get("error").is_none());

    // 3. Status reflects the authenticated state
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/s1/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let status: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status["authenticated"], true);
    assert_eq!(status["has_token"], true);

    // 4. The same search now succeeds
    let ok = post_rpc(&app, "s1", tool_call(3, "web_search", json!({"query": "rust"}))).await;
    assert!(ok.get("error").is_none());
    assert_eq!(gateway.call_count(), 1);
    let text = ok["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Result for rust"));

    // 5. Deleting the session closes the gate again
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/session/s1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let refused = post_rpc(&app, "s1", tool_call(4, "web_search", json!({"query": "x"}))).await;
    assert_eq!(refused["error"]["code"], -32001);
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error_not_transport_rejection() {
    let (app, _) = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/mcp/s1")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn test_unknown_method_over_http() {
    let (app, _) = create_test_app();

    let body = post_rpc(
        &app,
        "s1",
        json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
    )
    .await;
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_status_of_unknown_session_is_404() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session/ghost/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_session_still_succeeds() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/session/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 10_000)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "deleted");
    assert_eq!(body["session"], "ghost");
}

#[tokio::test]
async fn test_sse_stream_opens_and_registers_session() {
    let (services, _) = test_services();
    let app = router(AppState::new(Arc::clone(&services)));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/mcp/streamer")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"));

    // Opening the stream creates the session like any other reference
    assert!(services.sessions.peek("streamer").is_some());
}

#[tokio::test]
async fn test_tools_list_over_http() {
    let (app, _) = create_test_app();

    let body = post_rpc(
        &app,
        "s1",
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .await;

    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 3);
}
