//! HTTP adapter
//!
//! Depends only on core/ and the MCP dispatcher. Maps the dispatcher
//! onto request/response cycles and the SSE heartbeat stream, and
//! provides the auxiliary read-only endpoints.

pub mod handlers;
pub mod middleware;
pub mod sse;

use crate::core::error::GateError;
use crate::core::services::Services;
use crate::mcp::handlers::ProtocolHandlers;
use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub handlers: Arc<ProtocolHandlers>,
}

impl AppState {
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            handlers: Arc::new(ProtocolHandlers::new(Arc::clone(&services))),
            services,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_handler))
        // MCP endpoints, session id in the path
        .route("/mcp/:session_id", post(handlers::mcp_handler))
        .route("/mcp/:session_id", get(sse::heartbeat_handler))
        // Session endpoints
        .route(
            "/session/:session_id/status",
            get(handlers::session_status_handler),
        )
        .route(
            "/session/:session_id",
            delete(handlers::delete_session_handler),
        )
        // Add middleware
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        // Add shared state
        .with_state(state)
}

impl GateError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.is_not_authenticated() {
            StatusCode::UNAUTHORIZED
        } else if self.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else if self.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
