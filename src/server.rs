/// Server setup and initialization
///
/// Wires together all components: database, registry, builder session,
/// simulator scheduler, collaborators and HTTP routes.

use crate::{
    api::{create_router, AppState},
    config::Config,
    integrations::{DiscordNotifier, MockHyperliquidClient},
    persistence::{Database, SqliteEventLog},
    runtime::{ExecutionSimulator, SimulationScheduler},
    session::BuilderSession,
    workflow::{registry::ComponentRegistry, storage::WorkflowStorage, template::TemplateCatalog},
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

/// Build the shared application state
///
/// Opens the database, creates the builder session and a stopped simulator
/// reading the session's published snapshot.
pub async fn build_state(config: &Config) -> Result<AppState> {
    tracing::info!("📁 Opening database in {}", config.database.data_dir);
    let database = Database::open(&config.database.data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;

    tracing::info!("📊 Loading component registry and templates");
    let registry = Arc::new(ComponentRegistry::builtin());
    let templates = Arc::new(TemplateCatalog::builtin());
    tracing::debug!("{} component types, {} templates", registry.len(), templates.templates().len());

    let session = BuilderSession::new(Arc::clone(&registry));
    let published = session.published();

    tracing::info!("⏰ Initializing simulation scheduler");
    let simulator = SimulationScheduler::new(
        ExecutionSimulator::new(config.simulator.log_capacity),
        published,
        Arc::clone(&registry),
        config.simulator.tick_interval(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to initialize simulation scheduler: {}", e))?;

    let discord = DiscordNotifier::new(config.notifications.discord_webhook_url.clone());

    Ok(AppState {
        registry,
        session: Arc::new(Mutex::new(session)),
        simulator: Arc::new(simulator),
        templates,
        storage: WorkflowStorage::new(database.pool().clone()),
        trading: Arc::new(MockHyperliquidClient::new()),
        notifier: Arc::new(discord.clone()),
        discord,
        event_log: Arc::new(SqliteEventLog::new(database.pool().clone())),
    })
}

/// Assemble the full router (API routes plus health check)
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .merge(create_router(state))
}

/// Create the main Axum application with all routes and middleware
pub async fn create_app(config: Config) -> Result<Router> {
    let state = build_state(&config).await?;
    Ok(app_router(state))
}

/// Start the HTTP server
///
/// Serves until ctrl-c, then stops the simulation scheduler.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting HyperEasy builder server...");

    let state = build_state(&config).await?;
    let simulator = Arc::clone(&state.simulator);
    let app = app_router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    simulator.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("🛑 Shutdown signal received");
}

async fn health_check() -> &'static str {
    "ok"
}
