//! Tool handler trait and common types

use crate::mcp::error::McpError;
use crate::mcp::protocol::{ContentBlock, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for MCP tool implementations
///
/// Each tool (authenticate, validate_token, web_search) implements
/// this trait to provide schema and execution logic. Execution is
/// session-scoped: the dispatcher passes the id of the session the
/// request arrived on.
#[async_trait]
pub trait McpToolHandler: Send + Sync {
    /// Tool name (e.g., "web_search")
    fn name(&self) -> &str;

    /// Tool schema for tools/list
    fn schema(&self) -> ToolSchema;

    /// Execute tool with arguments in the context of a session
    async fn execute(&self, session_id: &str, args: Value) -> Result<ToolResult, McpError>;
}

/// Helper function to create a text content block
pub fn text_content(text: String) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::Text { text }],
    }
}
