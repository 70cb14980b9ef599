/// Builder session shell
///
/// Owns the editable graph, the wiring state machine and the user's session
/// preferences. After every mutation the current snapshot is published through
/// an `ArcSwap` so the simulator job can read it without touching the session
/// lock.

use crate::error::Result;
use crate::workflow::{
    graph::WorkflowGraph,
    registry::ComponentRegistry,
    template::{TemplateDefinition, TemplateLoadReport, TemplateLoader},
    types::{ComponentInstance, ComponentPatch, Connection, GraphSnapshot, Position},
    wiring::{ConnectionBuilder, HostSignal, WiringState},
};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-session UI preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPreferences {
    pub onboarding_completed: bool,
    /// Show the Hyperliquid tier in the component library
    pub enhanced_mode: bool,
}

impl Default for SessionPreferences {
    fn default() -> Self {
        Self {
            onboarding_completed: false,
            enhanced_mode: true,
        }
    }
}

/// Partial update of the preferences
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub onboarding_completed: Option<bool>,
    pub enhanced_mode: Option<bool>,
}

pub struct BuilderSession {
    graph: WorkflowGraph,
    wiring: ConnectionBuilder,
    preferences: SessionPreferences,
    published: Arc<ArcSwap<GraphSnapshot>>,
}

impl BuilderSession {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self::with_preferences(registry, SessionPreferences::default())
    }

    pub fn with_preferences(registry: Arc<ComponentRegistry>, preferences: SessionPreferences) -> Self {
        Self {
            graph: WorkflowGraph::new(registry),
            wiring: ConnectionBuilder::new(),
            preferences,
            published: Arc::new(ArcSwap::from_pointee(GraphSnapshot::default())),
        }
    }

    /// Shared handle to the most recently published snapshot
    pub fn published(&self) -> Arc<ArcSwap<GraphSnapshot>> {
        Arc::clone(&self.published)
    }

    fn publish(&self) {
        self.published.store(Arc::new(self.graph.snapshot()));
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }

    pub fn wiring_state(&self) -> &WiringState {
        self.wiring.state()
    }

    pub fn preferences(&self) -> &SessionPreferences {
        &self.preferences
    }

    pub fn update_preferences(&mut self, patch: PreferencesPatch) -> &SessionPreferences {
        if let Some(onboarding_completed) = patch.onboarding_completed {
            self.preferences.onboarding_completed = onboarding_completed;
        }
        if let Some(enhanced_mode) = patch.enhanced_mode {
            self.preferences.enhanced_mode = enhanced_mode;
        }
        &self.preferences
    }

    pub fn add_component(
        &mut self,
        type_id: &str,
        display_name: &str,
        position: Option<Position>,
    ) -> Result<ComponentInstance> {
        let instance = self
            .graph
            .add_component_at(type_id, display_name, position.unwrap_or_default())?;
        self.publish();
        Ok(instance)
    }

    pub fn patch_component(&mut self, id: &str, patch: ComponentPatch) -> Result<ComponentInstance> {
        let instance = self.graph.patch_component(id, patch)?;
        self.publish();
        Ok(instance)
    }

    pub fn update_component(&mut self, id: &str, patch: ComponentPatch) -> Result<ComponentInstance> {
        let instance = self.graph.update_component(id, patch)?;
        self.publish();
        Ok(instance)
    }

    /// Removing the pending wire's source also cancels the wire
    pub fn delete_component(&mut self, id: &str) -> bool {
        if self.wiring.pending_source() == Some(id) {
            self.wiring.cancel_connection();
        }
        let removed = self.graph.delete_component(id);
        if removed {
            self.publish();
        }
        removed
    }

    pub fn add_connection(
        &mut self,
        source_id: &str,
        target_id: &str,
        source_output: &str,
        target_input: &str,
    ) -> Result<Connection> {
        let connection = self
            .graph
            .add_connection(source_id, target_id, source_output, target_input)?;
        self.publish();
        Ok(connection)
    }

    pub fn delete_connection(&mut self, id: &str) -> bool {
        let removed = self.graph.delete_connection(id);
        if removed {
            self.publish();
        }
        removed
    }

    pub fn start_connection(&mut self, component_id: &str, output_port: &str) -> Result<()> {
        self.wiring.start_connection(&self.graph, component_id, output_port)
    }

    pub fn complete_connection(&mut self, target_id: &str, input_port: &str) -> Result<Connection> {
        let connection = self
            .wiring
            .complete_connection(&mut self.graph, target_id, input_port)?;
        self.publish();
        Ok(connection)
    }

    pub fn cancel_connection(&mut self) {
        self.wiring.cancel_connection();
    }

    pub fn handle_host_signal(&mut self, signal: HostSignal) {
        self.wiring.handle_host_signal(signal);
    }

    /// Replace the canvas with a template
    pub fn load_template(&mut self, template: &TemplateDefinition) -> Result<TemplateLoadReport> {
        self.wiring.cancel_connection();
        self.graph.clear();
        let report = TemplateLoader::load(&mut self.graph, template);
        self.publish();
        report
    }

    /// Replace the canvas with a saved snapshot, keeping its ids
    pub fn restore(&mut self, snapshot: GraphSnapshot) -> Result<()> {
        let graph = WorkflowGraph::from_snapshot(Arc::clone(self.graph.registry()), snapshot)?;
        self.wiring.cancel_connection();
        self.graph = graph;
        self.publish();
        tracing::info!("Restored canvas with {} components", self.graph.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.wiring.cancel_connection();
        self.graph.clear();
        self.publish();
    }

    pub fn export_template(&self, name: &str) -> TemplateDefinition {
        TemplateDefinition::from_snapshot(name, &self.graph.snapshot())
    }
}
