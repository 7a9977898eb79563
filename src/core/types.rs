//! Core data types for the searchgate service.
//!
//! Response payloads for the auxiliary REST endpoints. The JSON-RPC
//! envelope types live in the MCP adapter.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of live sessions in the store
    pub active_sessions: usize,
}

/// Session status response
///
/// Exposes token presence, never the token itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub authenticated: bool,
    pub has_token: bool,
    pub created_at: String,
    pub last_activity: String,
}

/// Session deletion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub session: String,
}
