//! searchgate stdio MCP server entry point
//!
//! For MCP clients that spawn the server as a subprocess. Logs go to
//! stderr so stdout stays clean for the protocol.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use searchgate::core::config::Config;
use searchgate::core::services::Services;
use searchgate::core::session::spawn_sweeper;
use searchgate::mcp::McpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stdout carries JSON-RPC; all diagnostics go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "searchgate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    config.log_config();

    let services = Arc::new(Services::new(config.clone()));

    let sweeper = spawn_sweeper(
        Arc::clone(&services.sessions),
        config.session.sweep_interval_sec,
        config.session.timeout_sec,
    );

    let mut server = McpServer::new(services);
    server.run().await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    Ok(())
}
