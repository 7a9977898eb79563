// End-to-end authentication gate flow through the JSON-RPC dispatcher

use crate::common::helpers::{test_services, FakeGateway};
use searchgate::core::search::SearchGateway;
use searchgate::core::services::Services;
use searchgate::mcp::handlers::ProtocolHandlers;
use searchgate::mcp::protocol::*;
use serde_json::json;
use std::sync::Arc;

fn tool_call(id: i64, name: &str, arguments: serde_json::Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(id)),
        method: "tools/call".to_string(),
        params: Some(json!({"name": name, "arguments": arguments})),
    }
}

struct Harness {
    services: Arc<Services>,
    gateway: Arc<FakeGateway>,
    handlers: ProtocolHandlers,
}

fn harness() -> Harness {
    let (services, gateway) = test_services();
    let handlers = ProtocolHandlers::new(Arc::clone(&services));
    Harness {
        services,
        gateway,
        handlers,
    }
}

#[tokio::test]
async fn test_search_refused_before_authentication() {
    let h = harness();

    let response = h
        .handlers
        .handle_request("s1", tool_call(1, "web_search", json!({"query": "rust"})))
        .await;

    let error = response.error.unwrap();
    assert_eq!(error.code, NOT_AUTHENTICATED);
    // Refusal must happen before the provider is contacted
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_full_authenticate_then_search_flow() {
    let h = harness();

    // Unauthenticated search is refused
    let refused = h
        .handlers
        .handle_request("s1", tool_call(1, "web_search", json!({"query": "rust"})))
        .await;
    assert_eq!(refused.error.unwrap().code, NOT_AUTHENTICATED);
    assert_eq!(h.gateway.call_count(), 0);

    // Authenticate flips the session gate
    let auth = h
        .handlers
        .handle_request("s1", tool_call(2, "authenticate", json!({})))
        .await;
    assert!(auth.error.is_none());

    let session = h.services.sessions.peek("s1").unwrap();
    assert!(session.authenticated);
    assert!(session.credential.is_some());

    // The same search now reaches the provider
    let response = h
        .handlers
        .handle_request("s1", tool_call(3, "web_search", json!({"query": "rust"})))
        .await;
    assert!(response.error.is_none());
    assert_eq!(h.gateway.call_count(), 1);

    let result = response.result.unwrap();
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Result for rust"));
}

#[tokio::test]
async fn test_authentication_is_per_session() {
    let h = harness();

    h.handlers
        .handle_request("alpha", tool_call(1, "authenticate", json!({})))
        .await;

    // A different session id stays gated
    let response = h
        .handlers
        .handle_request("beta", tool_call(2, "web_search", json!({"query": "x"})))
        .await;

    assert_eq!(response.error.unwrap().code, NOT_AUTHENTICATED);
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_deleted_session_requires_reauthentication() {
    let h = harness();

    h.handlers
        .handle_request("s1", tool_call(1, "authenticate", json!({})))
        .await;
    assert!(h.services.sessions.peek("s1").unwrap().authenticated);

    h.services.sessions.delete("s1");

    // The id is reused; the recreated session starts unauthenticated
    let response = h
        .handlers
        .handle_request("s1", tool_call(2, "web_search", json!({"query": "x"})))
        .await;
    assert_eq!(response.error.unwrap().code, NOT_AUTHENTICATED);
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_tool_error() {
    let gateway = Arc::new(FakeGateway::failing());
    let services = Arc::new(Services::with_gateway(
        crate::common::helpers::test_config(),
        Arc::clone(&gateway) as Arc<dyn SearchGateway>,
    ));
    let handlers = ProtocolHandlers::new(Arc::clone(&services));

    handlers
        .handle_request("s1", tool_call(1, "authenticate", json!({})))
        .await;

    let response = handlers
        .handle_request("s1", tool_call(2, "web_search", json!({"query": "x"})))
        .await;

    let error = response.error.unwrap();
    assert_eq!(error.code, UPSTREAM_FAILED);
    // The provider was contacted; the failure came from it
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn test_validate_token_does_not_authenticate_session() {
    let h = harness();

    let response = h
        .handlers
        .handle_request(
            "s1",
            tool_call(
                1,
                "validate_token",
                json!({"token": crate::common::helpers::TEST_SECRET}),
            ),
        )
        .await;
    assert!(response.error.is_none());

    // Diagnostic validation leaves the gate closed
    let session = h.services.sessions.peek("s1").unwrap();
    assert!(!session.authenticated);

    let refused = h
        .handlers
        .handle_request("s1", tool_call(2, "web_search", json!({"query": "x"})))
        .await;
    assert_eq!(refused.error.unwrap().code, NOT_AUTHENTICATED);
}

#[tokio::test]
async fn test_empty_query_rejected_after_gate() {
    let h = harness();

    h.handlers
        .handle_request("s1", tool_call(1, "authenticate", json!({})))
        .await;

    let response = h
        .handlers
        .handle_request("s1", tool_call(2, "web_search", json!({"query": "  "})))
        .await;

    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_max_results_clamped_to_cap() {
    let h = harness();

    h.handlers
        .handle_request("s1", tool_call(1, "authenticate", json!({})))
        .await;

    // Cap is 20; the fake returns at most 3 either way, the point is
    // that an oversized request is not an error
    let response = h
        .handlers
        .handle_request(
            "s1",
            tool_call(2, "web_search", json!({"query": "x", "max_results": 500})),
        )
        .await;

    assert!(response.error.is_none());
    assert_eq!(h.gateway.call_count(), 1);
}
