//! Validate token tool handler
//!
//! Stateless passthrough to the configured validator. Does not read
//! or mutate session state; an invalid token is a normal result, not
//! an error.

use super::handler::{text_content, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ValidateTokenHandler {
    services: Arc<Services>,
}

impl ValidateTokenHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ValidateTokenHandler {
    fn name(&self) -> &str {
        "validate_token"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "validate_token".to_string(),
            description: "Check a bearer token against the configured validation \
                          strategy. Returns validity, strategy kind, and claims. \
                          Does not affect session state."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "token": {
                        "type": "string",
                        "description": "Token to validate"
                    }
                },
                "required": ["token"]
            }),
        }
    }

    async fn execute(&self, _session_id: &str, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct ValidateArgs {
            token: String,
        }

        let args: ValidateArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let result = self.services.validator.validate(&args.token).await?;

        Ok(text_content(serde_json::to_string_pretty(&result)?))
    }
}
