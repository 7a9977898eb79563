//! Error types and error handling for the searchgate service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific error handling (JSON-RPC error
//! codes) is handled in the respective adapter modules.

use thiserror::Error;

/// Result type alias for searchgate operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for the searchgate service
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Credential unavailable: {0}")]
    CredentialUnavailable(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl GateError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, GateError::SessionNotFound(_))
    }

    /// Check if this is a precondition failure (authentication gate)
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, GateError::NotAuthenticated(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            GateError::InvalidRequest(_) | GateError::ConfigError(_)
        )
    }

    /// Check if the failure originated at an external service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GateError::UpstreamFailure(_) | GateError::CredentialUnavailable(_)
        )
    }
}
