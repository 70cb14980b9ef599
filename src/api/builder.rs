/// Builder canvas REST API endpoints
///
/// Thin handlers over the shared `BuilderSession`. Every mutation goes through
/// the session so the simulator sees the new snapshot on its next tick.

use super::{error::ApiError, state::AppState};
use crate::{
    session::{PreferencesPatch, SessionPreferences},
    workflow::{
        analysis::WorkflowSummary,
        registry::{ComponentTier, ComponentType},
        template::{TemplateDefinition, TemplateLoadReport},
        types::{
            ComponentInstance, ComponentPatch, Connection, GraphSnapshot, Position,
            DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT,
        },
        wiring::{HostSignal, WiringState},
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ComponentQuery {
    pub tier: Option<ComponentTier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddComponentRequest {
    pub type_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddConnectionRequest {
    pub source_id: String,
    pub target_id: String,
    #[serde(default = "default_output_port")]
    pub source_output: String,
    #[serde(default = "default_input_port")]
    pub target_input: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWireRequest {
    pub component_id: String,
    #[serde(default = "default_output_port")]
    pub output_port: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWireRequest {
    pub target_id: String,
    #[serde(default = "default_input_port")]
    pub input_port: String,
}

#[derive(Debug, Deserialize)]
pub struct SignalRequest {
    pub signal: HostSignal,
}

/// Either a catalog template id or an inline definition
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoadTemplateRequest {
    ById {
        #[serde(rename = "templateId")]
        template_id: String,
    },
    Inline {
        template: TemplateDefinition,
    },
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct WiringResponse {
    pub wiring: WiringState,
}

fn default_output_port() -> String {
    DEFAULT_OUTPUT_PORT.to_string()
}

fn default_input_port() -> String {
    DEFAULT_INPUT_PORT.to_string()
}

/// Create the component catalog and builder canvas routes
pub fn create_builder_routes() -> Router<AppState> {
    Router::new()
        .route("/api/components", get(list_component_types))
        .route("/api/builder", get(get_snapshot).delete(clear_canvas))
        .route("/api/builder/components", post(add_component))
        .route(
            "/api/builder/components/{id}",
            patch(patch_component).put(update_component).delete(delete_component),
        )
        .route("/api/builder/connections", post(add_connection))
        .route("/api/builder/connections/{id}", delete(delete_connection))
        .route("/api/builder/wiring", get(get_wiring))
        .route("/api/builder/wiring/start", post(start_wire))
        .route("/api/builder/wiring/complete", post(complete_wire))
        .route("/api/builder/wiring/cancel", post(cancel_wire))
        .route("/api/builder/wiring/signal", post(host_signal))
        .route("/api/builder/template", post(load_template))
        .route("/api/builder/export", post(export_template))
        .route("/api/builder/summary", get(get_summary))
        .route("/api/builder/preferences", get(get_preferences).put(update_preferences))
}

/// GET /api/components?tier=core|hyperliquid
///
/// Hyperliquid-tier types are hidden while enhanced mode is off, unless the
/// tier is asked for explicitly.
async fn list_component_types(
    State(state): State<AppState>,
    Query(query): Query<ComponentQuery>,
) -> Json<Vec<ComponentType>> {
    let types = match query.tier {
        Some(tier) => state.registry.by_tier(tier).cloned().collect(),
        None => {
            let enhanced = state.session.lock().await.preferences().enhanced_mode;
            state
                .registry
                .types()
                .iter()
                .filter(|t| enhanced || t.tier == ComponentTier::Core)
                .cloned()
                .collect()
        }
    };
    Json(types)
}

/// GET /api/builder
async fn get_snapshot(State(state): State<AppState>) -> Json<GraphSnapshot> {
    Json(state.session.lock().await.snapshot())
}

/// DELETE /api/builder
async fn clear_canvas(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.clear();
    tracing::info!("🧹 Canvas cleared");
    StatusCode::NO_CONTENT
}

/// POST /api/builder/components
/// Body: { "typeId": "place-order", "displayName": "Buy ETH", "position": {"x":..,"y":..} }
async fn add_component(
    State(state): State<AppState>,
    Json(payload): Json<AddComponentRequest>,
) -> Result<(StatusCode, Json<ComponentInstance>), ApiError> {
    // Unnamed components take the type's display name
    let display_name = payload
        .display_name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| state.registry.get(&payload.type_id).map(|t| t.display_name.clone()))
        .unwrap_or_default();
    let mut session = state.session.lock().await;
    let instance = session.add_component(&payload.type_id, &display_name, payload.position)?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// PATCH /api/builder/components/{id}
async fn patch_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ComponentPatch>,
) -> Result<Json<ComponentInstance>, ApiError> {
    let instance = state.session.lock().await.patch_component(&id, patch)?;
    Ok(Json(instance))
}

/// PUT /api/builder/components/{id}
///
/// Upsert: an unknown id is created from `typeId` in the body.
async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ComponentPatch>,
) -> Result<Json<ComponentInstance>, ApiError> {
    let instance = state.session.lock().await.update_component(&id, patch)?;
    Ok(Json(instance))
}

/// DELETE /api/builder/components/{id}
///
/// Deleting an id that is not on the canvas is a no-op.
async fn delete_component(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let removed = state.session.lock().await.delete_component(&id);
    Json(json!({ "id": id, "removed": removed }))
}

/// POST /api/builder/connections
async fn add_connection(
    State(state): State<AppState>,
    Json(payload): Json<AddConnectionRequest>,
) -> Result<(StatusCode, Json<Connection>), ApiError> {
    let connection = state.session.lock().await.add_connection(
        &payload.source_id,
        &payload.target_id,
        &payload.source_output,
        &payload.target_input,
    )?;
    Ok((StatusCode::CREATED, Json(connection)))
}

/// DELETE /api/builder/connections/{id}
async fn delete_connection(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    let removed = state.session.lock().await.delete_connection(&id);
    Json(json!({ "id": id, "removed": removed }))
}

/// GET /api/builder/wiring
async fn get_wiring(State(state): State<AppState>) -> Json<WiringResponse> {
    let wiring = state.session.lock().await.wiring_state().clone();
    Json(WiringResponse { wiring })
}

/// POST /api/builder/wiring/start
async fn start_wire(
    State(state): State<AppState>,
    Json(payload): Json<StartWireRequest>,
) -> Result<Json<WiringResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session.start_connection(&payload.component_id, &payload.output_port)?;
    Ok(Json(WiringResponse {
        wiring: session.wiring_state().clone(),
    }))
}

/// POST /api/builder/wiring/complete
async fn complete_wire(
    State(state): State<AppState>,
    Json(payload): Json<CompleteWireRequest>,
) -> Result<(StatusCode, Json<Connection>), ApiError> {
    let connection = state
        .session
        .lock()
        .await
        .complete_connection(&payload.target_id, &payload.input_port)?;
    Ok((StatusCode::CREATED, Json(connection)))
}

/// POST /api/builder/wiring/cancel
async fn cancel_wire(State(state): State<AppState>) -> Json<WiringResponse> {
    let mut session = state.session.lock().await;
    session.cancel_connection();
    Json(WiringResponse {
        wiring: session.wiring_state().clone(),
    })
}

/// POST /api/builder/wiring/signal
/// Body: { "signal": "background_click" | "escape" }
async fn host_signal(
    State(state): State<AppState>,
    Json(payload): Json<SignalRequest>,
) -> Json<WiringResponse> {
    let mut session = state.session.lock().await;
    session.handle_host_signal(payload.signal);
    Json(WiringResponse {
        wiring: session.wiring_state().clone(),
    })
}

/// POST /api/builder/template
/// Body: { "templateId": "hl-grid-bot-template" } or { "template": {...} }
async fn load_template(
    State(state): State<AppState>,
    Json(payload): Json<LoadTemplateRequest>,
) -> Result<Json<TemplateLoadReport>, ApiError> {
    let template = match payload {
        LoadTemplateRequest::ById { template_id } => state
            .templates
            .get(&template_id)
            .cloned()
            .ok_or_else(|| {
                ApiError::not_found("unknown_template", format!("Unknown template: '{}'", template_id))
            })?,
        LoadTemplateRequest::Inline { template } => template,
    };

    let report = state.session.lock().await.load_template(&template)?;
    tracing::info!(
        "📋 Loaded template {} ({} components, {} diagnostics)",
        template.id,
        report.components.len(),
        report.diagnostics.len()
    );
    Ok(Json(report))
}

/// POST /api/builder/export
async fn export_template(
    State(state): State<AppState>,
    Json(payload): Json<ExportRequest>,
) -> Result<Json<TemplateDefinition>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("invalid_request", "Template name must not be empty"));
    }
    let template = state.session.lock().await.export_template(&payload.name);
    Ok(Json(template))
}

/// GET /api/builder/summary
async fn get_summary(State(state): State<AppState>) -> Json<WorkflowSummary> {
    let snapshot = state.session.lock().await.snapshot();
    Json(WorkflowSummary::from_snapshot(&snapshot, &state.registry))
}

/// GET /api/builder/preferences
async fn get_preferences(State(state): State<AppState>) -> Json<SessionPreferences> {
    Json(state.session.lock().await.preferences().clone())
}

/// PUT /api/builder/preferences
async fn update_preferences(
    State(state): State<AppState>,
    Json(patch): Json<PreferencesPatch>,
) -> Json<SessionPreferences> {
    let mut session = state.session.lock().await;
    Json(session.update_preferences(patch).clone())
}
