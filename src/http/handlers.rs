//! HTTP request handlers for the searchgate API
//!
//! The JSON-RPC endpoint plus the auxiliary read-only endpoints:
//! health, session status, and session deletion.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use crate::core::error::GateError;
use crate::core::types::*;
use crate::http::AppState;
use crate::mcp::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};

/// Health check handler
///
/// Returns server status, version, and the live session count.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.services.sessions.count(),
    })
}

/// JSON-RPC endpoint handler
///
/// The session id comes from the URL path and is created implicitly
/// on first reference. The body is parsed here rather than by an
/// extractor so a malformed envelope yields a JSON-RPC parse error
/// (HTTP 200) instead of a transport-level rejection.
pub async fn mcp_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: String,
) -> Json<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return Json(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(JsonRpcError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {e}"),
                    data: None,
                }),
            });
        }
    };

    Json(state.handlers.handle_request(&session_id, request).await)
}

/// Session status handler
///
/// Read-only: reports the authenticated flag and token presence
/// without refreshing the session's activity timestamp.
pub async fn session_status_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatusResponse>, GateError> {
    let session = state
        .services
        .sessions
        .peek(&session_id)
        .ok_or_else(|| GateError::SessionNotFound(session_id.clone()))?;

    Ok(Json(SessionStatusResponse {
        session_id: session.id,
        authenticated: session.authenticated,
        has_token: session.credential.is_some(),
        created_at: session.created_at.to_rfc3339(),
        last_activity: session.last_activity.to_rfc3339(),
    }))
}

/// Delete session handler
///
/// Idempotent: deleting an absent session still reports success.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<DeleteResponse> {
    state.services.sessions.delete(&session_id);

    Json(DeleteResponse {
        status: "deleted".to_string(),
        session: session_id,
    })
}
