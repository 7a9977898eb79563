//! Web search tool handler
//!
//! The privileged tool: gated on session authentication. A gated
//! refusal returns a typed error before the gateway is ever
//! contacted.

use super::handler::{text_content, McpToolHandler};
use crate::core::search::SearchDepth;
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema, NOT_AUTHENTICATED};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub struct WebSearchHandler {
    services: Arc<Services>,
}

impl WebSearchHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    fn format_results(query: &str, results: &[crate::core::search::SearchResult]) -> String {
        if results.is_empty() {
            return format!("No results for \"{query}\".");
        }

        let mut out = format!("Results for \"{query}\":\n\n");
        for (i, r) in results.iter().enumerate() {
            out.push_str(&format!("{}. **{}**\n   {}\n", i + 1, r.title, r.url));
            if !r.content.is_empty() {
                out.push_str(&format!("   {}\n", r.content));
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    max_results: Option<usize>,
    #[serde(default)]
    search_depth: Option<SearchDepth>,
}

#[async_trait]
impl McpToolHandler for WebSearchHandler {
    fn name(&self) -> &str {
        "web_search"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "web_search".to_string(),
            description: "Search the web. Requires an authenticated session; \
                          call authenticate first."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Number of results to return",
                        "default": 5
                    },
                    "search_depth": {
                        "type": "string",
                        "enum": ["basic", "advanced"],
                        "description": "Provider search depth",
                        "default": "basic"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, session_id: &str, args: Value) -> Result<ToolResult, McpError> {
        // Gate check first: an unauthenticated session never reaches
        // the gateway.
        let authenticated = self
            .services
            .sessions
            .get(session_id)
            .map(|s| s.authenticated)
            .unwrap_or(false);

        if !authenticated {
            warn!(session_id, "web_search refused: not authenticated");
            return Err(McpError::ToolError(
                NOT_AUTHENTICATED,
                "Not authenticated: call the authenticate tool first".to_string(),
            ));
        }

        let args: SearchArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        if args.query.trim().is_empty() {
            return Err(McpError::InvalidParams(
                "Query cannot be empty".to_string(),
            ));
        }

        let config = &self.services.config.search;
        let max_results = args
            .max_results
            .unwrap_or(config.default_max_results)
            .min(config.max_results_cap);
        let depth = args.search_depth.unwrap_or_default();

        let results = self
            .services
            .search
            .search(&args.query, max_results, depth)
            .await?;

        info!(
            session_id,
            results = results.len(),
            "web_search completed"
        );
        Ok(text_content(Self::format_results(&args.query, &results)))
    }
}
