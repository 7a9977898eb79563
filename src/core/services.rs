//! Unified service container for searchgate
//!
//! Provides shared access to all core services.

use crate::core::auth::{CredentialSource, TokenValidator};
use crate::core::config::Config;
use crate::core::search::{SearchGateway, TavilyGateway};
use crate::core::session::SessionStore;
use std::sync::Arc;

/// Unified services container
///
/// Both adapters (HTTP and stdio) use this same struct for service
/// access. The session store is an owned instance, never a global,
/// so tests can build isolated containers.
#[derive(Clone)]
pub struct Services {
    /// Concurrent session registry
    pub sessions: Arc<SessionStore>,

    /// Token validation strategy
    pub validator: Arc<TokenValidator>,

    /// Source of the server's own credential
    pub credentials: Arc<CredentialSource>,

    /// External search capability
    pub search: Arc<dyn SearchGateway>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let search = Arc::new(TavilyGateway::new(
            &config.search.api_key,
            config.search.request_timeout_sec,
        ));
        Self::with_gateway(config, search)
    }

    /// Create services with a caller-supplied gateway.
    ///
    /// Tests inject fakes here to observe (or forbid) delegation.
    pub fn with_gateway(config: Config, search: Arc<dyn SearchGateway>) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            validator: Arc::new(TokenValidator::from_config(&config.auth)),
            credentials: Arc::new(CredentialSource::from_config(&config.auth)),
            search,
            config: Arc::new(config),
        }
    }
}
