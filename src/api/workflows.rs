/// Saved workflow REST API endpoints
///
/// Saves the current canvas under a name and reopens saved canvases into the
/// builder session. Saved ids are kept, so reopening and saving again
/// overwrites the same record.

use super::{error::ApiError, state::AppState};
use crate::workflow::{
    storage::{SavedWorkflow, WorkflowMetadata},
    types::GraphSnapshot,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Response for save operations
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub message: String,
}

/// Request body for saving the current canvas
#[derive(Debug, Deserialize)]
pub struct SaveWorkflowRequest {
    /// Existing id to overwrite; a new one is generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct WorkflowList {
    pub workflows: Vec<WorkflowMetadata>,
}

/// Create saved workflow routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", post(save_workflow).get(list_workflows))
        .route("/api/workflows/{id}", get(get_workflow).delete(delete_workflow))
        .route("/api/workflows/{id}/open", post(open_workflow))
}

/// Save the current canvas
///
/// POST /api/workflows
/// Body: { "id": "optional", "name": "My strategy" }
async fn save_workflow(
    State(state): State<AppState>,
    Json(payload): Json<SaveWorkflowRequest>,
) -> Result<(StatusCode, Json<WorkflowResponse>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("invalid_request", "Workflow name must not be empty"));
    }

    let workflow = SavedWorkflow {
        id: payload
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("workflow-{}", Uuid::new_v4())),
        name: name.to_string(),
        snapshot: state.session.lock().await.snapshot(),
    };

    state
        .storage
        .save_workflow(&workflow)
        .await
        .map_err(|e| ApiError::internal("Failed to save workflow", e))?;

    tracing::info!(
        "💾 Saved canvas as workflow {} ({}) with {} components",
        workflow.id,
        workflow.name,
        workflow.snapshot.components.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(WorkflowResponse {
            message: format!("Workflow '{}' saved successfully", workflow.name),
            id: workflow.id,
        }),
    ))
}

/// List saved workflows
///
/// GET /api/workflows
async fn list_workflows(State(state): State<AppState>) -> Result<Json<WorkflowList>, ApiError> {
    let workflows = state
        .storage
        .list_workflows()
        .await
        .map_err(|e| ApiError::internal("Failed to list workflows", e))?;
    Ok(Json(WorkflowList { workflows }))
}

async fn find_workflow(state: &AppState, id: &str) -> Result<SavedWorkflow, ApiError> {
    state
        .storage
        .get_workflow(id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get workflow {}", id), e))?
        .ok_or_else(|| ApiError::not_found("unknown_workflow", format!("Unknown workflow: '{}'", id)))
}

/// GET /api/workflows/{id}
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedWorkflow>, ApiError> {
    Ok(Json(find_workflow(&state, &id).await?))
}

/// Replace the builder canvas with a saved workflow
///
/// POST /api/workflows/{id}/open
async fn open_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GraphSnapshot>, ApiError> {
    let workflow = find_workflow(&state, &id).await?;

    let mut session = state.session.lock().await;
    session.restore(workflow.snapshot)?;
    tracing::info!("📂 Opened workflow {} ({})", workflow.id, workflow.name);
    Ok(Json(session.snapshot()))
}

/// DELETE /api/workflows/{id}
async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removed = state
        .storage
        .delete_workflow(&id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to delete workflow {}", id), e))?;

    if !removed {
        return Err(ApiError::not_found("unknown_workflow", format!("Unknown workflow: '{}'", id)));
    }

    tracing::info!("🗑️ Deleted workflow: {}", id);
    Ok(Json(json!({ "message": "Workflow deleted successfully" })))
}
