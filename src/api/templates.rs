/// Template catalog endpoints (read-only)

use super::{error::ApiError, state::AppState};
use crate::workflow::template::TemplateDefinition;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
}

pub fn create_template_routes() -> Router<AppState> {
    Router::new()
        .route("/api/templates", get(list_templates))
        .route("/api/templates/{id}", get(get_template))
}

/// GET /api/templates?category=Trading
async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Json<Vec<TemplateDefinition>> {
    let templates = match query.category.as_deref() {
        Some(category) => state.templates.by_category(category).cloned().collect(),
        None => state.templates.templates().to_vec(),
    };
    Json(templates)
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TemplateDefinition>, ApiError> {
    state
        .templates
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("unknown_template", format!("Unknown template: '{}'", id)))
}
