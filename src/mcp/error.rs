//! MCP-specific error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Tool error (code {0}): {1}")]
    ToolError(i32, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<crate::core::error::GateError> for McpError {
    fn from(err: crate::core::error::GateError) -> Self {
        use crate::core::error::GateError;
        use crate::mcp::protocol;
        match err {
            GateError::NotAuthenticated(s) => McpError::ToolError(
                protocol::NOT_AUTHENTICATED,
                format!("Not authenticated: {s}"),
            ),
            GateError::SessionNotFound(s) => McpError::ToolError(
                protocol::SESSION_NOT_FOUND,
                format!("Session not found: {s}"),
            ),
            // Upstream causes are logged where they occur; only the
            // generic message travels to the caller.
            GateError::UpstreamFailure(s) => {
                McpError::ToolError(protocol::UPSTREAM_FAILED, s)
            }
            GateError::CredentialUnavailable(s) => {
                McpError::ToolError(protocol::UPSTREAM_FAILED, s)
            }
            GateError::InvalidRequest(s) => McpError::InvalidParams(s),
            GateError::ConfigError(s) => {
                McpError::InvalidParams(format!("Configuration error: {s}"))
            }
            GateError::IoError(e) => McpError::InternalError(format!("I/O error: {e}")),
            GateError::SerdeError(e) => {
                McpError::InternalError(format!("Serialization error: {e}"))
            }
            GateError::TomlError(e) => {
                McpError::InternalError(format!("Configuration parse error: {e}"))
            }
        }
    }
}
