// Test helper functions

use async_trait::async_trait;
use searchgate::core::config::Config;
use searchgate::core::error::{GateError, Result};
use searchgate::core::search::{SearchDepth, SearchGateway, SearchResult};
use searchgate::core::services::Services;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-local-secret";

/// Config with a valid local-mode auth setup
#[allow(dead_code)] // Used across integration test binaries
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.local_token = TEST_SECRET.to_string();
    config
}

/// Search gateway fake that records call counts
///
/// Used to verify the authentication gate: a refused call must leave
/// the counter untouched.
pub struct FakeGateway {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeGateway {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchGateway for FakeGateway {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        _depth: SearchDepth,
    ) -> Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GateError::UpstreamFailure(
                "Search provider unreachable".to_string(),
            ));
        }
        let result = SearchResult {
            title: format!("Result for {query}"),
            url: "https://example.com/doc".to_string(),
            content: "relevant snippet".to_string(),
            score: Some(0.87),
        };
        Ok(std::iter::repeat(result).take(max_results.min(3)).collect())
    }
}

/// Services wired to a fake gateway, returning both
#[allow(dead_code)]
pub fn test_services() -> (Arc<Services>, Arc<FakeGateway>) {
    let gateway = Arc::new(FakeGateway::new());
    let services = Arc::new(Services::with_gateway(test_config(), Arc::clone(&gateway) as Arc<dyn SearchGateway>));
    (services, gateway)
}
