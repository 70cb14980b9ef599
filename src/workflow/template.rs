/// Workflow templates
///
/// A template describes a workflow shape in terms of component type ids
/// rather than concrete instances. Loading materializes fresh instances and
/// resolves the type-keyed edges onto their generated ids.

use crate::error::{BuilderError, Result};
use crate::workflow::graph::WorkflowGraph;
use crate::workflow::types::{
    ComponentConfig, ComponentInstance, ComponentPatch, Connection, GraphSnapshot, Position,
    DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Components per row when laying out template slots
const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    #[serde(alias = "type")]
    pub type_id: String,
    #[serde(default, alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub config: ComponentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEdge {
    #[serde(alias = "fromTypeId")]
    pub from: String,
    #[serde(alias = "toTypeId")]
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "components")]
    pub slots: Vec<TemplateSlot>,
    #[serde(default, alias = "connections")]
    pub edges: Vec<TemplateEdge>,
}

impl TemplateDefinition {
    /// Capture a canvas as a reusable template
    ///
    /// Connections are rewritten to type-keyed edges; ids and positions are
    /// not kept.
    pub fn from_snapshot(name: &str, snapshot: &GraphSnapshot) -> Self {
        let slots = snapshot
            .components
            .iter()
            .map(|component| TemplateSlot {
                type_id: component.type_id.clone(),
                display_name: component.display_name.clone(),
                config: component.config.clone(),
            })
            .collect();

        let edges = snapshot
            .connections
            .iter()
            .filter_map(|connection| {
                let source = snapshot.component(&connection.source_id)?;
                let target = snapshot.component(&connection.target_id)?;
                Some(TemplateEdge {
                    from: source.type_id.clone(),
                    to: target.type_id.clone(),
                })
            })
            .collect();

        Self {
            id: format!("custom-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            description: String::new(),
            category: "Custom".to_string(),
            slots,
            edges,
        }
    }
}

/// Problem found while loading a template that did not abort the load
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDiagnostic {
    pub code: &'static str,
    pub message: String,
}

impl From<&BuilderError> for TemplateDiagnostic {
    fn from(error: &BuilderError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// Everything a template load inserted, plus what it dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLoadReport {
    pub components: Vec<ComponentInstance>,
    pub connections: Vec<Connection>,
    pub diagnostics: Vec<TemplateDiagnostic>,
}

/// Grid position of the slot at `index`
pub fn slot_position(index: usize) -> Position {
    Position::new(
        100.0 + (index % GRID_COLUMNS) as f64 * 200.0,
        100.0 + (index / GRID_COLUMNS) as f64 * 150.0,
    )
}

pub struct TemplateLoader;

impl TemplateLoader {
    /// Materialize a template into `graph`
    ///
    /// Loading is best effort: slots with an unknown type, edges that cannot
    /// be resolved and edges the graph rejects are skipped and reported as
    /// diagnostics. When a type id repeats, edges bind to its first slot.
    pub fn load(graph: &mut WorkflowGraph, template: &TemplateDefinition) -> Result<TemplateLoadReport> {
        tracing::info!(
            "Loading template '{}' ({} slots, {} edges)",
            template.name,
            template.slots.len(),
            template.edges.len()
        );

        let mut report = TemplateLoadReport::default();
        let mut instance_ids: HashMap<&str, String> = HashMap::new();

        for (index, slot) in template.slots.iter().enumerate() {
            let type_name = match graph.registry().lookup(&slot.type_id) {
                Ok(component_type) => component_type.display_name.clone(),
                Err(e) => {
                    tracing::warn!("Template '{}': slot {} skipped: {}", template.name, index, e);
                    report.diagnostics.push(TemplateDiagnostic::from(&e));
                    continue;
                }
            };
            let display_name = if slot.display_name.is_empty() {
                type_name
            } else {
                slot.display_name.clone()
            };

            let mut instance = graph.add_component_at(&slot.type_id, &display_name, slot_position(index))?;
            if !slot.config.is_empty() {
                instance = graph.patch_component(&instance.id, ComponentPatch::config(slot.config.clone()))?;
            }

            instance_ids
                .entry(slot.type_id.as_str())
                .or_insert_with(|| instance.id.clone());
            report.components.push(instance);
        }

        for edge in &template.edges {
            let endpoints = instance_ids
                .get(edge.from.as_str())
                .zip(instance_ids.get(edge.to.as_str()));

            let Some((source_id, target_id)) = endpoints else {
                let error = BuilderError::TemplateEdgeUnresolved {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                };
                tracing::warn!("Template '{}': {}", template.name, error);
                report.diagnostics.push(TemplateDiagnostic::from(&error));
                continue;
            };

            match graph.add_connection(source_id, target_id, DEFAULT_OUTPUT_PORT, DEFAULT_INPUT_PORT) {
                Ok(connection) => report.connections.push(connection),
                Err(e) => {
                    tracing::warn!(
                        "Template '{}': edge {} -> {} rejected: {}",
                        template.name,
                        edge.from,
                        edge.to,
                        e
                    );
                    report.diagnostics.push(TemplateDiagnostic::from(&e));
                }
            }
        }

        tracing::info!(
            "Template '{}' loaded: {} components, {} connections, {} diagnostics",
            template.name,
            report.components.len(),
            report.connections.len(),
            report.diagnostics.len()
        );
        Ok(report)
    }
}

/// Read-only set of templates offered to the user
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<TemplateDefinition>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<TemplateDefinition>) -> Self {
        Self { templates }
    }

    pub fn builtin() -> Self {
        Self::new(crate::workflow::catalog::builtin_templates())
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDefinition> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub fn templates(&self) -> &[TemplateDefinition] {
        &self.templates
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a TemplateDefinition> + 'a {
        self.templates
            .iter()
            .filter(move |template| template.category.eq_ignore_ascii_case(category))
    }
}
