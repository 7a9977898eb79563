//! Configuration management for the searchgate service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Secrets (tokens, client secrets, API keys) are never logged.

use crate::core::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between SSE heartbeat events
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_sec: u64,
}

/// Token validation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Shared-secret token compared against `auth.local_token`
    Local,
    /// Signed JWT verified against the issuer's JWKS
    Oauth,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Which validator strategy to use
    #[serde(default = "default_auth_mode")]
    pub mode: AuthMode,

    /// Shared secret for `local` mode
    #[serde(default)]
    pub local_token: String,

    /// Issuer domain for `oauth` mode (e.g. "tenant.auth0.com")
    #[serde(default)]
    pub domain: String,

    /// Expected `aud` claim for `oauth` mode
    #[serde(default)]
    pub audience: String,

    /// Client id for the client-credentials grant
    #[serde(default)]
    pub client_id: String,

    /// Client secret for the client-credentials grant
    #[serde(default)]
    pub client_secret: String,

    /// Timeout for requests to the token authority, in seconds
    #[serde(default = "default_auth_timeout")]
    pub request_timeout_sec: u64,
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Idle seconds before a session is swept. Zero disables expiry.
    #[serde(default = "default_session_timeout")]
    pub timeout_sec: u64,

    /// Seconds between sweep runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_sec: u64,
}

/// Search provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Tavily API key
    #[serde(default)]
    pub api_key: String,

    /// Default number of results when the caller omits max_results
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Upper bound on results per query
    #[serde(default = "default_result_cap")]
    pub max_results_cap: usize,

    /// Timeout for requests to the search provider, in seconds
    #[serde(default = "default_search_timeout")]
    pub request_timeout_sec: u64,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_heartbeat_interval() -> u64 {
    15
}

fn default_auth_mode() -> AuthMode {
    AuthMode::Local
}

fn default_auth_timeout() -> u64 {
    10
}

fn default_session_timeout() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_results() -> usize {
    5
}

fn default_result_cap() -> usize {
    20
}

fn default_search_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            heartbeat_interval_sec: default_heartbeat_interval(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: default_auth_mode(),
            local_token: String::new(),
            domain: String::new(),
            audience: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            request_timeout_sec: default_auth_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_sec: default_session_timeout(),
            sweep_interval_sec: default_sweep_interval(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_max_results: default_max_results(),
            max_results_cap: default_result_cap(),
            request_timeout_sec: default_search_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| GateError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// The TOML file is taken from `SEARCHGATE_CONFIG` if set, otherwise
    /// `./searchgate.toml` if present.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SEARCHGATE_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("searchgate.toml").exists() {
            Self::from_file("searchgate.toml")?
        } else {
            Self::default()
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Server configuration
        if let Ok(host) = env::var("SEARCHGATE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SEARCHGATE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(interval) = env::var("SEARCHGATE_HEARTBEAT_INTERVAL_SEC") {
            if let Ok(i) = interval.parse() {
                self.server.heartbeat_interval_sec = i;
            }
        }

        // Auth configuration
        if let Ok(mode) = env::var("SEARCHGATE_AUTH_MODE") {
            match mode.to_lowercase().as_str() {
                "local" => self.auth.mode = AuthMode::Local,
                "oauth" => self.auth.mode = AuthMode::Oauth,
                _ => {}
            }
        }
        if let Ok(token) = env::var("SEARCHGATE_LOCAL_TOKEN") {
            self.auth.local_token = token;
        }
        if let Ok(domain) = env::var("SEARCHGATE_AUTH_DOMAIN") {
            self.auth.domain = domain;
        }
        if let Ok(audience) = env::var("SEARCHGATE_AUTH_AUDIENCE") {
            self.auth.audience = audience;
        }
        if let Ok(id) = env::var("SEARCHGATE_CLIENT_ID") {
            self.auth.client_id = id;
        }
        if let Ok(secret) = env::var("SEARCHGATE_CLIENT_SECRET") {
            self.auth.client_secret = secret;
        }

        // Session configuration
        if let Ok(timeout) = env::var("SEARCHGATE_SESSION_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.session.timeout_sec = t;
            }
        }
        if let Ok(interval) = env::var("SEARCHGATE_SWEEP_INTERVAL_SEC") {
            if let Ok(i) = interval.parse() {
                self.session.sweep_interval_sec = i;
            }
        }

        // Search configuration
        if let Ok(key) = env::var("TAVILY_API_KEY") {
            self.search.api_key = key;
        }
        if let Ok(max) = env::var("SEARCHGATE_DEFAULT_MAX_RESULTS") {
            if let Ok(m) = max.parse() {
                self.search.default_max_results = m;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.heartbeat_interval_sec == 0 {
            return Err(GateError::ConfigError(
                "Heartbeat interval must be non-zero".to_string(),
            ));
        }

        if self.session.sweep_interval_sec == 0 {
            return Err(GateError::ConfigError(
                "Sweep interval must be non-zero".to_string(),
            ));
        }

        match self.auth.mode {
            AuthMode::Local => {
                if self.auth.local_token.is_empty() {
                    return Err(GateError::ConfigError(
                        "auth.local_token is required in local mode".to_string(),
                    ));
                }
            }
            AuthMode::Oauth => {
                if self.auth.domain.is_empty() {
                    return Err(GateError::ConfigError(
                        "auth.domain is required in oauth mode".to_string(),
                    ));
                }
                // Bare host, no scheme or path; the issuer URL is
                // derived from it
                let issuer = format!("https://{}/", self.auth.domain);
                if self.auth.domain.contains('/') || url::Url::parse(&issuer).is_err() {
                    return Err(GateError::ConfigError(
                        "auth.domain must be a bare host name".to_string(),
                    ));
                }
                if self.auth.audience.is_empty() {
                    return Err(GateError::ConfigError(
                        "auth.audience is required in oauth mode".to_string(),
                    ));
                }
            }
        }

        if self.search.default_max_results == 0 {
            return Err(GateError::ConfigError(
                "Default max results must be non-zero".to_string(),
            ));
        }

        if self.search.default_max_results > self.search.max_results_cap {
            return Err(GateError::ConfigError(
                "Default max results cannot exceed the result cap".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Bind: {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  Heartbeat interval: {}s",
            self.server.heartbeat_interval_sec
        );
        tracing::info!("  Auth mode: {:?}", self.auth.mode);
        tracing::info!("  Local token set: {}", !self.auth.local_token.is_empty());
        if !self.auth.domain.is_empty() {
            tracing::info!("  Auth domain: {}", self.auth.domain);
        }
        if self.session.timeout_sec == 0 {
            tracing::info!("  Session expiry: disabled");
        } else {
            tracing::info!("  Session timeout: {}s", self.session.timeout_sec);
            tracing::info!("  Sweep interval: {}s", self.session.sweep_interval_sec);
        }
        tracing::info!("  Search key set: {}", !self.search.api_key.is_empty());
        tracing::info!(
            "  Default max results: {}",
            self.search.default_max_results
        );
    }
}
