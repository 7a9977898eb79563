//! Shared-secret token strategy for local deployments.

use crate::core::auth::{TokenValidationResult, ValidationKind};
use crate::core::error::{GateError, Result};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Validates a presented token against the configured shared secret
pub struct LocalTokenValidator {
    secret: String,
}

impl LocalTokenValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Compare the presented token to the shared secret.
    ///
    /// Equal-length comparison runs in constant time; an empty token
    /// is always invalid.
    pub fn validate(&self, token: &str) -> TokenValidationResult {
        if token.is_empty() {
            warn!("Empty token presented");
            return TokenValidationResult::invalid(ValidationKind::LocalToken);
        }

        let presented = token.as_bytes();
        let expected = self.secret.as_bytes();

        if presented.len() != expected.len() {
            warn!("Token rejected");
            return TokenValidationResult::invalid(ValidationKind::LocalToken);
        }

        if bool::from(presented.ct_eq(expected)) {
            debug!("Local token validated");
            TokenValidationResult::valid(ValidationKind::LocalToken, None)
        } else {
            warn!("Token rejected");
            TokenValidationResult::invalid(ValidationKind::LocalToken)
        }
    }
}

/// Hands out the configured shared token as the server's credential
pub struct LocalTokenSource {
    token: String,
}

impl LocalTokenSource {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }

    pub fn obtain(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(GateError::CredentialUnavailable(
                "No local token configured".to_string(),
            ));
        }
        Ok(self.token.clone())
    }
}
