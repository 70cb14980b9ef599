/// HyperEasy: no-code workflow builder for Hyperliquid
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use hypereasy::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Builder canvas API at /api/builder/*
/// - Simulator control at /api/simulator/*
/// - Saved workflows at /api/workflows/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
