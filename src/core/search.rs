//! Thin adapter to the external web search capability.
//!
//! The gateway is a trait so the dispatcher can be exercised against
//! a fake in tests; the production implementation talks to the Tavily
//! HTTP API. Provider failures come back as `UpstreamFailure` with a
//! generic message, the underlying cause is only logged.

use crate::core::error::{GateError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Search depth requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

/// One normalized search result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// External search capability
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Execute a search, returning a normalized result list.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        depth: SearchDepth,
    ) -> Result<Vec<SearchResult>>;
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: SearchDepth,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Tavily-backed search gateway
pub struct TavilyGateway {
    api_key: String,
    http: reqwest::Client,
}

impl TavilyGateway {
    pub fn new(api_key: &str, timeout_sec: u64) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_sec))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl SearchGateway for TavilyGateway {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        depth: SearchDepth,
    ) -> Result<Vec<SearchResult>> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
            search_depth: depth,
        };

        let response = self
            .http
            .post(TAVILY_SEARCH_URL)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Search provider unreachable: {e}");
                GateError::UpstreamFailure("Search provider unreachable".to_string())
            })?;

        if !response.status().is_success() {
            error!("Search provider returned HTTP {}", response.status());
            return Err(GateError::UpstreamFailure(
                "Search provider rejected the request".to_string(),
            ));
        }

        let body: TavilyResponse = response.json().await.map_err(|e| {
            error!("Search response parse failed: {e}");
            GateError::UpstreamFailure("Search provider returned malformed data".to_string())
        })?;

        debug!(results = body.results.len(), "Search completed");
        Ok(body.results)
    }
}
