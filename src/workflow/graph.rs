/// Workflow graph
///
/// Holds the placed component instances and the directed connections between
/// them. Every mutation leaves the graph satisfying the structural rules:
/// connections only reference present components, never loop onto their own
/// source, and only run from an output-capable type to an input-capable type.
/// Cycles and parallel duplicate connections are allowed.

use crate::error::{BuilderError, Result};
use crate::workflow::registry::{ComponentRegistry, ComponentType};
use crate::workflow::types::{
    ComponentInstance, ComponentPatch, Connection, GraphSnapshot, PortDirection, Position,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory workflow graph bound to a component registry
///
/// Components and connections are kept in insertion order; the simulator and
/// renderers rely on that order being stable.
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    registry: Arc<ComponentRegistry>,
    components: Vec<ComponentInstance>,
    connections: Vec<Connection>,
}

impl WorkflowGraph {
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            components: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Rebuild a graph from a saved snapshot
    ///
    /// Ids are preserved. Every component type must be registered and every
    /// connection must pass the same checks as `add_connection`.
    pub fn from_snapshot(registry: Arc<ComponentRegistry>, snapshot: GraphSnapshot) -> Result<Self> {
        let mut graph = Self::new(registry);
        let mut seen = HashSet::new();

        for component in snapshot.components {
            graph.registry.lookup(&component.type_id)?;
            if !seen.insert(component.id.clone()) {
                return Err(BuilderError::DuplicateComponent(component.id));
            }
            graph.components.push(component);
        }

        let mut seen_connections = HashSet::new();
        for connection in snapshot.connections {
            graph.validate_connection(&connection.source_id, &connection.target_id)?;
            if !seen_connections.insert(connection.id.clone()) {
                return Err(BuilderError::DuplicateConnection(connection.id));
            }
            graph.connections.push(connection);
        }

        tracing::debug!(
            "Restored graph with {} components and {} connections",
            graph.components.len(),
            graph.connections.len()
        );
        Ok(graph)
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Place a component at the default drop point
    pub fn add_component(&mut self, type_id: &str, display_name: &str) -> Result<ComponentInstance> {
        self.add_component_at(type_id, display_name, Position::default())
    }

    /// Place a new component with an empty configuration
    pub fn add_component_at(
        &mut self,
        type_id: &str,
        display_name: &str,
        position: Position,
    ) -> Result<ComponentInstance> {
        self.registry.lookup(type_id)?;

        let instance = ComponentInstance {
            id: format!("{}-{}", type_id, Uuid::new_v4()),
            type_id: type_id.to_string(),
            display_name: display_name.to_string(),
            config: Default::default(),
            position,
        };

        tracing::info!("Added component '{}' ({})", instance.display_name, instance.id);
        self.components.push(instance.clone());
        Ok(instance)
    }

    /// Merge a partial update into an existing component
    ///
    /// Config merge is shallow: patched keys overwrite, other keys survive.
    pub fn patch_component(&mut self, id: &str, patch: ComponentPatch) -> Result<ComponentInstance> {
        let component = self
            .components
            .iter_mut()
            .find(|component| component.id == id)
            .ok_or_else(|| BuilderError::UnknownComponent(id.to_string()))?;

        if let Some(type_id) = &patch.type_id {
            if *type_id != component.type_id {
                tracing::warn!(
                    "Ignoring type change of component '{}' from '{}' to '{}'",
                    id,
                    component.type_id,
                    type_id
                );
            }
        }
        if let Some(display_name) = patch.display_name {
            component.display_name = display_name;
        }
        if let Some(config) = patch.config {
            component.config.extend(config);
        }
        if let Some(position) = patch.position {
            component.position = position;
        }

        tracing::debug!("Patched component {}", id);
        Ok(component.clone())
    }

    /// Upsert shim kept for callers that share one path for drop and update
    ///
    /// Patches when `id` exists. Otherwise inserts a component under that exact
    /// id, which requires `patch.type_id`; the name defaults to the type's
    /// display name.
    pub fn update_component(&mut self, id: &str, patch: ComponentPatch) -> Result<ComponentInstance> {
        if self.contains_component(id) {
            return self.patch_component(id, patch);
        }

        let type_id = patch
            .type_id
            .clone()
            .ok_or_else(|| BuilderError::IncompleteInsert(id.to_string()))?;
        let component_type = self.registry.lookup(&type_id)?;

        let instance = ComponentInstance {
            id: id.to_string(),
            display_name: patch
                .display_name
                .unwrap_or_else(|| component_type.display_name.clone()),
            type_id,
            config: patch.config.unwrap_or_default(),
            position: patch.position.unwrap_or_default(),
        };

        tracing::info!("Inserted component '{}' through update ({})", instance.display_name, id);
        self.components.push(instance.clone());
        Ok(instance)
    }

    /// Remove a component and every connection touching it
    ///
    /// Returns whether anything was removed; an unknown id is a no-op.
    pub fn delete_component(&mut self, id: &str) -> bool {
        let before = self.components.len();
        self.components.retain(|component| component.id != id);
        if self.components.len() == before {
            tracing::debug!("Delete of unknown component {} ignored", id);
            return false;
        }

        let connections_before = self.connections.len();
        self.connections
            .retain(|connection| connection.source_id != id && connection.target_id != id);

        tracing::info!(
            "Deleted component {} and {} attached connections",
            id,
            connections_before - self.connections.len()
        );
        true
    }

    /// Connect two components through named ports
    ///
    /// Checks run in order: both ids present, no self-loop, source can emit,
    /// target can accept. The graph is unchanged on failure.
    pub fn add_connection(
        &mut self,
        source_id: &str,
        target_id: &str,
        source_output: &str,
        target_input: &str,
    ) -> Result<Connection> {
        self.validate_connection(source_id, target_id)?;

        let connection = Connection {
            id: format!("conn-{}", Uuid::new_v4()),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            source_output: source_output.to_string(),
            target_input: target_input.to_string(),
        };

        tracing::info!(
            "Connected {}.{} -> {}.{}",
            source_id,
            source_output,
            target_id,
            target_input
        );
        self.connections.push(connection.clone());
        Ok(connection)
    }

    /// Remove a connection; returns whether it existed
    pub fn delete_connection(&mut self, id: &str) -> bool {
        let before = self.connections.len();
        self.connections.retain(|connection| connection.id != id);
        let removed = self.connections.len() != before;
        if removed {
            tracing::info!("Deleted connection {}", id);
        }
        removed
    }

    fn validate_connection(&self, source_id: &str, target_id: &str) -> Result<()> {
        let source = self.existing_type(source_id)?;
        let target = self.existing_type(target_id)?;

        if source_id == target_id {
            return Err(BuilderError::SelfLoop(source_id.to_string()));
        }
        if !source.can_emit_output {
            return Err(BuilderError::PortCapabilityViolation {
                component_id: source_id.to_string(),
                type_id: source.type_id.clone(),
                direction: PortDirection::Output,
            });
        }
        if !target.can_accept_input {
            return Err(BuilderError::PortCapabilityViolation {
                component_id: target_id.to_string(),
                type_id: target.type_id.clone(),
                direction: PortDirection::Input,
            });
        }
        Ok(())
    }

    /// Resolve a placed component to its registry type
    fn existing_type(&self, id: &str) -> Result<&ComponentType> {
        let component = self
            .component(id)
            .ok_or_else(|| BuilderError::UnknownComponent(id.to_string()))?;
        self.registry.lookup(&component.type_id)
    }

    /// Type of a placed component, if both exist
    pub fn component_type(&self, id: &str) -> Option<&ComponentType> {
        self.existing_type(id).ok()
    }

    pub fn component(&self, id: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|component| component.id == id)
    }

    pub fn contains_component(&self, id: &str) -> bool {
        self.component(id).is_some()
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == id)
    }

    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Read-only copy for rendering, storage and simulation
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            components: self.components.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        tracing::debug!(
            "Clearing graph ({} components, {} connections)",
            self.components.len(),
            self.connections.len()
        );
        self.components.clear();
        self.connections.clear();
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::{DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT};
    use serde_json::json;

    fn graph() -> WorkflowGraph {
        WorkflowGraph::new(Arc::new(ComponentRegistry::builtin()))
    }

    fn wire(graph: &mut WorkflowGraph, source: &str, target: &str) -> Result<Connection> {
        graph.add_connection(source, target, DEFAULT_OUTPUT_PORT, DEFAULT_INPUT_PORT)
    }

    #[test]
    fn add_component_starts_empty() {
        let mut graph = graph();
        let feed = graph.add_component("market-data", "Feed").unwrap();

        assert!(feed.id.starts_with("market-data-"));
        assert!(feed.config.is_empty());
        assert_eq!(feed.position, Position::default());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn add_component_rejects_unknown_type() {
        let mut graph = graph();
        let err = graph.add_component("teleporter", "Nope").unwrap_err();
        assert_eq!(err, BuilderError::UnknownComponentType("teleporter".to_string()));
        assert!(graph.is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut graph = graph();
        let ids: HashSet<String> = (0..50)
            .map(|_| graph.add_component("place-order", "Buy").unwrap().id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn delete_cascades_connections() {
        let mut graph = graph();
        let feed = graph.add_component("market-data", "Feed").unwrap();
        let buy = graph.add_component("place-order", "Buy").unwrap();
        let notify = graph.add_component("discord-webhook", "Notify").unwrap();
        wire(&mut graph, &feed.id, &buy.id).unwrap();
        wire(&mut graph, &buy.id, &notify.id).unwrap();
        wire(&mut graph, &feed.id, &buy.id).unwrap();

        assert!(graph.delete_component(&buy.id));

        assert!(graph
            .connections()
            .iter()
            .all(|c| c.source_id != buy.id && c.target_id != buy.id));
        assert!(graph.connections().is_empty());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn deleting_feed_leaves_only_buy() {
        let mut graph = graph();
        let feed = graph.add_component("market-data", "Feed").unwrap();
        let buy = graph.add_component("place-order", "Buy").unwrap();
        wire(&mut graph, &feed.id, &buy.id).unwrap();

        graph.delete_component(&feed.id);

        assert!(graph.connections().is_empty());
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.components()[0].display_name, "Buy");
    }

    #[test]
    fn delete_unknown_component_is_noop() {
        let mut graph = graph();
        graph.add_component("market-data", "Feed").unwrap();
        assert!(!graph.delete_component("missing"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut graph = graph();
        let feed = graph.add_component("market-data", "Feed").unwrap();
        let buy = graph.add_component("place-order", "Buy").unwrap();

        assert_eq!(
            wire(&mut graph, &feed.id, &feed.id).unwrap_err(),
            BuilderError::SelfLoop(feed.id.clone())
        );
        assert_eq!(
            wire(&mut graph, &buy.id, &buy.id).unwrap_err(),
            BuilderError::SelfLoop(buy.id.clone())
        );
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn source_without_output_is_rejected() {
        let mut graph = graph();
        let balance = graph.add_component("user-balance", "Balance").unwrap();
        let discord = graph.add_component("discord-webhook", "Alerts").unwrap();
        let buy = graph.add_component("place-order", "Buy").unwrap();

        for source in [&balance, &discord] {
            let err = wire(&mut graph, &source.id, &buy.id).unwrap_err();
            assert!(matches!(
                err,
                BuilderError::PortCapabilityViolation { direction: PortDirection::Output, .. }
            ));
        }
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn target_without_input_is_rejected() {
        let mut graph = graph();
        let buy = graph.add_component("place-order", "Buy").unwrap();
        let feed = graph.add_component("market-data", "Feed").unwrap();

        let err = wire(&mut graph, &buy.id, &feed.id).unwrap_err();
        assert_eq!(
            err,
            BuilderError::PortCapabilityViolation {
                component_id: feed.id.clone(),
                type_id: "market-data".to_string(),
                direction: PortDirection::Input,
            }
        );
    }

    #[test]
    fn connection_to_missing_component_is_rejected() {
        let mut graph = graph();
        let feed = graph.add_component("market-data", "Feed").unwrap();
        assert_eq!(
            wire(&mut graph, &feed.id, "ghost").unwrap_err(),
            BuilderError::UnknownComponent("ghost".to_string())
        );
    }

    #[test]
    fn parallel_duplicates_and_cycles_are_allowed() {
        let mut graph = graph();
        let a = graph.add_component("place-order", "A").unwrap();
        let b = graph.add_component("vault-manager", "B").unwrap();

        let first = wire(&mut graph, &a.id, &b.id).unwrap();
        let second = wire(&mut graph, &a.id, &b.id).unwrap();
        wire(&mut graph, &b.id, &a.id).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(graph.connections().len(), 3);
    }

    #[test]
    fn patch_merges_config_shallowly() {
        let mut graph = graph();
        let buy = graph.add_component("place-order", "Buy").unwrap();

        let mut config = serde_json::Map::new();
        config.insert("asset".to_string(), json!("BTC"));
        config.insert("amount".to_string(), json!(2));
        graph.patch_component(&buy.id, ComponentPatch::config(config)).unwrap();

        let mut config = serde_json::Map::new();
        config.insert("amount".to_string(), json!(5));
        let patched = graph.patch_component(&buy.id, ComponentPatch::config(config)).unwrap();

        assert_eq!(patched.config["asset"], json!("BTC"));
        assert_eq!(patched.config["amount"], json!(5));
        assert_eq!(patched.display_name, "Buy");
    }

    #[test]
    fn patch_keeps_type() {
        let mut graph = graph();
        let buy = graph.add_component("place-order", "Buy").unwrap();
        let patch = ComponentPatch {
            type_id: Some("scheduler".to_string()),
            display_name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let patched = graph.patch_component(&buy.id, patch).unwrap();
        assert_eq!(patched.type_id, "place-order");
        assert_eq!(patched.display_name, "Renamed");
    }

    #[test]
    fn patch_unknown_component_fails() {
        let mut graph = graph();
        assert_eq!(
            graph
                .patch_component("ghost", ComponentPatch::display_name("x"))
                .unwrap_err(),
            BuilderError::UnknownComponent("ghost".to_string())
        );
    }

    #[test]
    fn update_inserts_when_missing() {
        let mut graph = graph();
        let patch = ComponentPatch {
            type_id: Some("scheduler".to_string()),
            position: Some(Position::new(40.0, 80.0)),
            ..Default::default()
        };
        let inserted = graph.update_component("scheduler-legacy", patch).unwrap();

        assert_eq!(inserted.id, "scheduler-legacy");
        assert_eq!(inserted.display_name, "Scheduler");
        assert_eq!(inserted.position, Position::new(40.0, 80.0));

        let updated = graph
            .update_component("scheduler-legacy", ComponentPatch::display_name("Hourly"))
            .unwrap();
        assert_eq!(updated.display_name, "Hourly");
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn update_without_type_cannot_insert() {
        let mut graph = graph();
        assert_eq!(
            graph
                .update_component("ghost", ComponentPatch::display_name("x"))
                .unwrap_err(),
            BuilderError::IncompleteInsert("ghost".to_string())
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn snapshot_round_trips_through_restore() {
        let registry = Arc::new(ComponentRegistry::builtin());
        let mut graph = WorkflowGraph::new(Arc::clone(&registry));
        let feed = graph.add_component("market-data", "Feed").unwrap();
        let buy = graph.add_component("place-order", "Buy").unwrap();
        wire(&mut graph, &feed.id, &buy.id).unwrap();

        let restored = WorkflowGraph::from_snapshot(registry, graph.snapshot()).unwrap();
        assert_eq!(restored.snapshot(), graph.snapshot());
    }

    #[test]
    fn restore_rejects_invalid_snapshots() {
        let registry = Arc::new(ComponentRegistry::builtin());
        let mut graph = WorkflowGraph::new(Arc::clone(&registry));
        let feed = graph.add_component("market-data", "Feed").unwrap();

        let mut duplicated = graph.snapshot();
        duplicated.components.push(feed.clone());
        assert_eq!(
            WorkflowGraph::from_snapshot(Arc::clone(&registry), duplicated).unwrap_err(),
            BuilderError::DuplicateComponent(feed.id.clone())
        );

        let buy = graph.add_component("place-order", "Buy").unwrap();
        let wire = graph
            .add_connection(&feed.id, &buy.id, DEFAULT_OUTPUT_PORT, DEFAULT_INPUT_PORT)
            .unwrap();
        let mut repeated_wire = graph.snapshot();
        repeated_wire.connections.push(wire.clone());
        assert_eq!(
            WorkflowGraph::from_snapshot(Arc::clone(&registry), repeated_wire).unwrap_err(),
            BuilderError::DuplicateConnection(wire.id.clone())
        );

        let mut dangling = graph.snapshot();
        dangling.connections.push(Connection {
            id: "conn-stale".to_string(),
            source_id: feed.id.clone(),
            target_id: "gone".to_string(),
            source_output: DEFAULT_OUTPUT_PORT.to_string(),
            target_input: DEFAULT_INPUT_PORT.to_string(),
        });
        assert_eq!(
            WorkflowGraph::from_snapshot(registry, dangling).unwrap_err(),
            BuilderError::UnknownComponent("gone".to_string())
        );
    }

    #[test]
    fn named_ports_do_not_restrict_wiring() {
        let registry = Arc::new(ComponentRegistry::builtin());
        let mut graph = WorkflowGraph::new(Arc::clone(&registry));
        let lp = graph.add_component("hl-liquidity-provider", "LP").unwrap();
        let tracker = graph.add_component("hl-portfolio-tracker", "Tracker").unwrap();

        let lp_type = registry.get("hl-liquidity-provider").unwrap();
        assert!(!lp_type.outputs.is_empty());
        assert!(!lp_type.outputs.iter().any(|port| port == DEFAULT_OUTPUT_PORT));

        let connection = graph
            .add_connection(&lp.id, &tracker.id, DEFAULT_OUTPUT_PORT, DEFAULT_INPUT_PORT)
            .unwrap();
        assert_eq!(connection.source_output, DEFAULT_OUTPUT_PORT);
    }
}
