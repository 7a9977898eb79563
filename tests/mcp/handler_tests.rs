//! MCP handler unit tests

#[cfg(test)]
mod tests {
    use crate::common::helpers::{test_services, TEST_SECRET};
    use searchgate::mcp::handlers::ProtocolHandlers;
    use searchgate::mcp::protocol::*;
    use serde_json::json;
    use std::sync::Arc;

    fn request(method: &str, params: Option<serde_json::Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_handler() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers
            .handle_request(
                "s1",
                request(
                    "initialize",
                    Some(json!({
                        "protocolVersion": "2024-11-05",
                        "capabilities": {"tools": {}},
                        "clientInfo": {"name": "test", "version": "1.0"}
                    })),
                ),
            )
            .await;

        assert_eq!(response.jsonrpc, "2.0");
        assert!(response.error.is_none());

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "searchgate");
    }

    #[tokio::test]
    async fn test_tools_list_enumerates_exactly_three_tools() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers.handle_request("s1", request("tools/list", None)).await;

        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);

        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["authenticate", "validate_token", "web_search"]);

        // Every tool carries a JSON-Schema-shaped input descriptor
        for tool in tools {
            assert_eq!(tool["inputSchema"]["type"], "object");
            assert!(tool["description"].as_str().unwrap().len() > 10);
        }
    }

    #[tokio::test]
    async fn test_web_search_schema_defaults() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers.handle_request("s1", request("tools/list", None)).await;
        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();

        let search = tools.iter().find(|t| t["name"] == "web_search").unwrap();
        let schema = &search["inputSchema"];
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["properties"]["max_results"]["default"], 5);
        assert_eq!(
            schema["properties"]["search_depth"]["enum"],
            json!(["basic", "advanced"])
        );
        assert_eq!(schema["properties"]["search_depth"]["default"], "basic");
    }

    #[tokio::test]
    async fn test_unknown_method_returns_method_not_found() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers
            .handle_request("s1", request("resources/list", None))
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers
            .handle_request(
                "s1",
                request("tools/call", Some(json!({"name": "delete_everything"}))),
            )
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert!(error.message.contains("delete_everything"));
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers.handle_request("s1", request("tools/call", None)).await;

        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_ping() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers.handle_request("s1", request("ping", None)).await;
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_dispatch_creates_session_lazily() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(Arc::clone(&services));

        assert!(services.sessions.peek("lazy").is_none());
        handlers.handle_request("lazy", request("ping", None)).await;
        assert!(services.sessions.peek("lazy").is_some());
    }

    #[tokio::test]
    async fn test_validate_token_via_dispatch() {
        let (services, _) = test_services();
        let handlers = ProtocolHandlers::new(services);

        let response = handlers
            .handle_request(
                "s1",
                request(
                    "tools/call",
                    Some(json!({
                        "name": "validate_token",
                        "arguments": {"token": TEST_SECRET}
                    })),
                ),
            )
            .await;

        assert!(response.error.is_none());
        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"valid\": true"));
    }

}
