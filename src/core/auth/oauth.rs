//! Signed-claims token strategy backed by the issuer's JWKS.
//!
//! Validation is strictly ordered and fails closed: structure, header
//! key id, key lookup, RS256 signature, audience, issuer. Any failing
//! step yields an invalid result, never partial success.
//!
//! The key set is fetched once over HTTPS and cached for the process
//! lifetime. No TTL or refresh; an unknown `kid` after the first fetch
//! is rejected rather than triggering a re-fetch.

use crate::core::auth::{TokenValidationResult, ValidationKind};
use crate::core::error::{GateError, Result};
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Clock skew leeway for token expiry validation
const LEEWAY_SECS: u64 = 60;

/// Seconds subtracted from a cached access token's lifetime so it is
/// refreshed before the authority would reject it
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// JWKS response structure (RFC 7517)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JwkSet {
    pub(crate) keys: Vec<Jwk>,
}

/// Individual JWK from the issuer's key set
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Jwk {
    pub(crate) kid: Option<String>,
    pub(crate) kty: String,
    /// RSA modulus (base64url encoded)
    pub(crate) n: Option<String>,
    /// RSA exponent (base64url encoded)
    pub(crate) e: Option<String>,
}

/// Handles `aud` being either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StringOrArray {
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrArray {
    fn contains(&self, value: &str) -> bool {
        match self {
            StringOrArray::Single(s) => s == value,
            StringOrArray::Multiple(v) => v.iter().any(|s| s == value),
        }
    }
}

/// Check that the `aud` claim contains the configured audience.
///
/// Accepts a single value or a set; matches when the configured
/// audience is a member.
pub(crate) fn audience_matches(claims: &HashMap<String, Value>, audience: &str) -> bool {
    let Some(aud) = claims.get("aud") else {
        return false;
    };
    match serde_json::from_value::<StringOrArray>(aud.clone()) {
        Ok(aud) => aud.contains(audience),
        Err(_) => false,
    }
}

/// Check that the `iss` claim equals the expected issuer string.
pub(crate) fn issuer_matches(claims: &HashMap<String, Value>, expected: &str) -> bool {
    claims.get("iss").and_then(Value::as_str) == Some(expected)
}

/// Select the key matching the header's `kid`. Fails closed when no
/// key matches.
pub(crate) fn select_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
}

/// JWKS-backed validator for RS256 bearer tokens
pub struct SignedClaimsValidator {
    domain: String,
    audience: String,
    http: reqwest::Client,
    jwks: OnceCell<JwkSet>,
}

impl SignedClaimsValidator {
    pub fn new(domain: &str, audience: &str, timeout_sec: u64) -> Self {
        Self {
            domain: domain.to_string(),
            audience: audience.to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_sec))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            jwks: OnceCell::new(),
        }
    }

    /// Expected issuer derived from the trusted domain
    fn expected_issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }

    /// Validate a signed token.
    ///
    /// Returns `Err` only when the JWKS cannot be fetched; every other
    /// failure mode is an invalid result.
    pub async fn validate(&self, token: &str) -> Result<TokenValidationResult> {
        // (a) compact JWS structure: exactly three dot-separated parts
        if token.split('.').count() != 3 {
            warn!("Token rejected: malformed structure");
            return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
        }

        // (b) header decode for the key identifier
        let header = match decode_header(token) {
            Ok(h) => h,
            Err(e) => {
                warn!("Token rejected: undecodable header: {e}");
                return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
            }
        };
        let Some(kid) = header.kid else {
            warn!("Token rejected: no kid in header");
            return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
        };

        // (c) issuer key set, fetched once per process
        let jwks = self
            .jwks
            .get_or_try_init(|| self.fetch_jwks())
            .await?;

        // (d) fail closed when no key matches
        let Some(jwk) = select_key(jwks, &kid) else {
            warn!(kid = %kid, "Token rejected: unknown signing key");
            return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
        };

        let decoding_key = match build_decoding_key(jwk) {
            Ok(k) => k,
            Err(reason) => {
                warn!("Token rejected: {reason}");
                return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
            }
        };

        // (e) signature and expiry; audience and issuer are checked
        // manually afterwards to keep the ordering explicit
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        validation.leeway = LEEWAY_SECS;

        let claims = match decode::<HashMap<String, Value>>(token, &decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                warn!("Token rejected: signature verification failed: {e}");
                return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
            }
        };

        // (f) audience membership
        if !audience_matches(&claims, &self.audience) {
            warn!("Token rejected: audience mismatch");
            return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
        }

        // (g) issuer equality
        if !issuer_matches(&claims, &self.expected_issuer()) {
            warn!("Token rejected: issuer mismatch");
            return Ok(TokenValidationResult::invalid(ValidationKind::SignedClaims));
        }

        debug!("Signed token validated");
        Ok(TokenValidationResult::valid(
            ValidationKind::SignedClaims,
            Some(claims),
        ))
    }

    async fn fetch_jwks(&self) -> Result<JwkSet> {
        let url = self.jwks_url();
        let response = self.http.get(&url).send().await.map_err(|e| {
            GateError::UpstreamFailure(format!("JWKS fetch failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(GateError::UpstreamFailure(format!(
                "JWKS fetch failed: HTTP {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| GateError::UpstreamFailure(format!("JWKS parse failed: {e}")))
    }
}

fn build_decoding_key(jwk: &Jwk) -> std::result::Result<DecodingKey, String> {
    if jwk.kty != "RSA" {
        return Err(format!("unsupported key type: {}", jwk.kty));
    }
    let n = jwk.n.as_ref().ok_or("RSA JWK missing 'n'")?;
    let e = jwk.e.as_ref().ok_or("RSA JWK missing 'e'")?;
    DecodingKey::from_rsa_components(n, e).map_err(|e| format!("bad RSA components: {e}"))
}

/// Access token response from the authority's token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    token: String,
    expires_at: chrono::DateTime<Utc>,
}

/// Obtains the server's credential via the client-credentials grant
///
/// The issued access token is cached until shortly before it expires.
pub struct ClientCredentialsSource {
    domain: String,
    client_id: String,
    client_secret: String,
    audience: String,
    http: reqwest::Client,
    cached: tokio::sync::Mutex<Option<CachedToken>>,
}

impl ClientCredentialsSource {
    pub fn new(
        domain: &str,
        client_id: &str,
        client_secret: &str,
        audience: &str,
        timeout_sec: u64,
    ) -> Self {
        Self {
            domain: domain.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            audience: audience.to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_sec))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cached: tokio::sync::Mutex::new(None),
        }
    }

    pub async fn obtain(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.expires_at > Utc::now() {
                debug!("Using cached access token");
                return Ok(entry.token.clone());
            }
        }

        let url = format!("https://{}/oauth/token", self.domain);
        let body = serde_json::json!({
            "grant_type": "client_credentials",
            "client_id": self.client_id,
            "client_secret": self.client_secret,
            "audience": self.audience,
        });

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            GateError::CredentialUnavailable(format!("Token endpoint unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(GateError::CredentialUnavailable(format!(
                "Token endpoint returned HTTP {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            GateError::CredentialUnavailable(format!("Token response parse failed: {e}"))
        })?;

        let lifetime = token.expires_in.unwrap_or(0) - TOKEN_REFRESH_MARGIN_SECS;
        if lifetime > 0 {
            *cached = Some(CachedToken {
                token: token.access_token.clone(),
                expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
            });
        }

        Ok(token.access_token)
    }
}
