//! searchgate HTTP server entry point
//!
//! Starts the JSON-RPC-over-HTTP server with SSE heartbeats and the
//! background session sweeper.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use searchgate::core::config::Config;
use searchgate::core::services::Services;
use searchgate::core::session::spawn_sweeper;
use searchgate::http::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "searchgate=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting searchgate service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    config.log_config();

    // Create shared services
    let services = Arc::new(Services::new(config.clone()));

    // Start the background session sweeper
    let sweeper = spawn_sweeper(
        Arc::clone(&services.sessions),
        config.session.sweep_interval_sec,
        config.session.timeout_sec,
    );

    // Build the router
    let app = router(AppState::new(Arc::clone(&services)));

    // Bind to address and start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    // Serve until shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // Stop the sweeper with the server
    if let Some(handle) = sweeper {
        handle.abort();
    }

    Ok(())
}
