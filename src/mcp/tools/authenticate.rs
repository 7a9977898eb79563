//! Authenticate tool handler
//!
//! Obtains the server's own credential, validates it, and on success
//! flips the session to the authenticated state. Takes no caller
//! input; failure is reported to the caller and leaves the session
//! untouched.

use super::handler::{text_content, McpToolHandler};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema, AUTHENTICATION_FAILED};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AuthenticateHandler {
    services: Arc<Services>,
}

impl AuthenticateHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for AuthenticateHandler {
    fn name(&self) -> &str {
        "authenticate"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "authenticate".to_string(),
            description: "Authenticate this session using the server's configured \
                          credential. Must be called before web_search. Re-running \
                          re-validates the credential and refreshes the session."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, session_id: &str, _args: Value) -> Result<ToolResult, McpError> {
        let token = self.services.credentials.obtain().await?;

        let result = self.services.validator.validate(&token).await?;
        if !result.valid {
            warn!(session_id, "Credential failed validation");
            return Err(McpError::ToolError(
                AUTHENTICATION_FAILED,
                "Authentication failed: credential did not validate".to_string(),
            ));
        }

        // Flag, credential, and claims change together; no observer
        // can see an authenticated session without a credential.
        let session = self
            .services
            .sessions
            .authenticate(session_id, token, result.claims);

        info!(session_id, "Session authenticated via {:?}", result.kind);
        Ok(text_content(format!(
            "Authenticated session `{}` ({:?} strategy).",
            session.id, result.kind
        )))
    }
}
