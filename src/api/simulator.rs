/// Execution simulator endpoints
///
/// Start/stop the tick job and read the activity log shown in the log viewer.

use super::{error::ApiError, state::AppState};
use crate::runtime::SimulatorStatus;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    /// False when the simulator was already in the requested state
    pub changed: bool,
    #[serde(flatten)]
    pub status: SimulatorStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickResponse {
    pub appended: usize,
    #[serde(flatten)]
    pub status: SimulatorStatus,
}

pub fn create_simulator_routes() -> Router<AppState> {
    Router::new()
        .route("/api/simulator", get(get_status))
        .route("/api/simulator/start", post(start_simulation))
        .route("/api/simulator/stop", post(stop_simulation))
        .route("/api/simulator/tick", post(tick_simulation))
        .route("/api/simulator/log", axum::routing::delete(clear_log))
}

async fn get_status(State(state): State<AppState>) -> Json<SimulatorStatus> {
    Json(state.simulator.status().await)
}

/// POST /api/simulator/start
async fn start_simulation(State(state): State<AppState>) -> Result<Json<TransitionResponse>, ApiError> {
    let changed = state
        .simulator
        .start()
        .await
        .map_err(|e| ApiError::internal("Failed to start simulation", e))?;

    Ok(Json(TransitionResponse {
        changed,
        status: state.simulator.status().await,
    }))
}

/// POST /api/simulator/stop
async fn stop_simulation(State(state): State<AppState>) -> Result<Json<TransitionResponse>, ApiError> {
    let changed = state
        .simulator
        .stop()
        .await
        .map_err(|e| ApiError::internal("Failed to stop simulation", e))?;

    Ok(Json(TransitionResponse {
        changed,
        status: state.simulator.status().await,
    }))
}

/// POST /api/simulator/tick
///
/// Runs one tick now; appends nothing while the simulator is stopped.
async fn tick_simulation(State(state): State<AppState>) -> Json<TickResponse> {
    let appended = state.simulator.tick_now().await;
    Json(TickResponse {
        appended,
        status: state.simulator.status().await,
    })
}

/// DELETE /api/simulator/log
async fn clear_log(State(state): State<AppState>) -> Json<SimulatorStatus> {
    state.simulator.clear_log().await;
    Json(state.simulator.status().await)
}
