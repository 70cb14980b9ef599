/// HTTP API Layer
///
/// This module provides the REST API over the builder session. It handles:
/// - Component catalog and canvas editing
/// - Interactive wiring and template loading
/// - Simulator control and the activity log
/// - Saved workflows, trading and notifications

// Error type and status mapping
pub mod error;

// Shared handler state
pub mod state;

// Catalog and canvas endpoints
pub mod builder;

// Simulator control endpoints
pub mod simulator;

// Template catalog endpoints
pub mod templates;

// Saved workflow endpoints
pub mod workflows;

// Trading, Discord and activity endpoints
pub mod trading;

// Request recording middleware
pub mod usage;

pub use error::ApiError;
pub use state::AppState;

use axum::{middleware, Router};

/// Build all API routes with usage recording attached
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(builder::create_builder_routes())
        .merge(simulator::create_simulator_routes())
        .merge(templates::create_template_routes())
        .merge(workflows::create_workflow_routes())
        .merge(trading::create_trading_routes())
        .layer(middleware::from_fn_with_state(state.clone(), usage::record_usage))
        .with_state(state)
}
