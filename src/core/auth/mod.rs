//! Token validation and credential acquisition.
//!
//! Two interchangeable validator strategies sit behind one call:
//! a shared-secret comparison for local deployments and JWKS-backed
//! signed-claims verification for OAuth deployments. The strategy is
//! a tagged variant selected by configuration, not a trait object.
//!
//! Invalid tokens are a normal result (`valid == false`), never an
//! error. Only transport failures reaching the token authority
//! surface as `GateError`.

pub mod local;
pub mod oauth;

use crate::core::config::{AuthConfig, AuthMode};
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub use local::{LocalTokenSource, LocalTokenValidator};
pub use oauth::{ClientCredentialsSource, SignedClaimsValidator};

/// Which strategy produced a validation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    LocalToken,
    SignedClaims,
}

/// Outcome of validating a presented credential
///
/// `valid == false` is a normal value; callers must treat it as a
/// refusal, not retry it as an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenValidationResult {
    pub valid: bool,
    pub kind: ValidationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<HashMap<String, Value>>,
}

impl TokenValidationResult {
    pub fn valid(kind: ValidationKind, claims: Option<HashMap<String, Value>>) -> Self {
        Self {
            valid: true,
            kind,
            claims,
        }
    }

    pub fn invalid(kind: ValidationKind) -> Self {
        Self {
            valid: false,
            kind,
            claims: None,
        }
    }
}

/// Validator strategy selected by `auth.mode`
pub enum TokenValidator {
    Local(LocalTokenValidator),
    Oauth(SignedClaimsValidator),
}

impl TokenValidator {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.mode {
            AuthMode::Local => Self::Local(LocalTokenValidator::new(&config.local_token)),
            AuthMode::Oauth => Self::Oauth(SignedClaimsValidator::new(
                &config.domain,
                &config.audience,
                config.request_timeout_sec,
            )),
        }
    }

    /// Validate a presented token.
    ///
    /// Fails closed: any structural or claim mismatch yields an
    /// invalid result. `Err` is reserved for transport failures
    /// reaching the authority.
    pub async fn validate(&self, token: &str) -> Result<TokenValidationResult> {
        match self {
            Self::Local(v) => Ok(v.validate(token)),
            Self::Oauth(v) => v.validate(token).await,
        }
    }
}

/// Where the server obtains its own credential for `authenticate`
///
/// The caller never supplies a token to `authenticate`; the server
/// holds a shared local token or trades client credentials for one.
pub enum CredentialSource {
    Local(LocalTokenSource),
    ClientCredentials(ClientCredentialsSource),
}

impl CredentialSource {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config.mode {
            AuthMode::Local => Self::Local(LocalTokenSource::new(&config.local_token)),
            AuthMode::Oauth => Self::ClientCredentials(ClientCredentialsSource::new(
                &config.domain,
                &config.client_id,
                &config.client_secret,
                &config.audience,
                config.request_timeout_sec,
            )),
        }
    }

    pub async fn obtain(&self) -> Result<String> {
        match self {
            Self::Local(s) => s.obtain(),
            Self::ClientCredentials(s) => s.obtain().await,
        }
    }
}
