/// Workflow structure analysis
///
/// Summaries for the builder header and the preview dialog. Chain selection
/// follows the simulator's rules: only simulation triggers start a chain and
/// only one hop is followed.

use crate::workflow::registry::ComponentRegistry;
use crate::workflow::types::GraphSnapshot;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::Serialize;
use std::collections::HashMap;

/// One trigger and the components it directly drives
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowChain {
    pub trigger_id: String,
    pub trigger_name: String,
    pub action_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub component_count: usize,
    pub trigger_count: usize,
    /// Components whose type accepts input
    pub action_count: usize,
    pub connection_count: usize,
    pub chains: Vec<WorkflowChain>,
    pub has_cycles: bool,
}

impl WorkflowSummary {
    pub fn from_snapshot(snapshot: &GraphSnapshot, registry: &ComponentRegistry) -> Self {
        let mut trigger_count = 0;
        let mut action_count = 0;
        let mut chains = Vec::new();

        for component in &snapshot.components {
            let Some(component_type) = registry.get(&component.type_id) else {
                continue;
            };
            if component_type.can_accept_input {
                action_count += 1;
            }
            if !component_type.is_simulation_trigger {
                continue;
            }
            trigger_count += 1;

            let action_names: Vec<String> = snapshot
                .outgoing(&component.id)
                .filter_map(|connection| snapshot.component(&connection.target_id))
                .map(|target| target.display_name.clone())
                .collect();
            if !action_names.is_empty() {
                chains.push(WorkflowChain {
                    trigger_id: component.id.clone(),
                    trigger_name: component.display_name.clone(),
                    action_names,
                });
            }
        }

        Self {
            component_count: snapshot.components.len(),
            trigger_count,
            action_count,
            connection_count: snapshot.connections.len(),
            chains,
            has_cycles: has_cycles(snapshot),
        }
    }
}

/// Whether the connections form a directed cycle
pub fn has_cycles(snapshot: &GraphSnapshot) -> bool {
    let mut graph = DiGraph::<&str, ()>::new();
    let nodes: HashMap<&str, _> = snapshot
        .components
        .iter()
        .map(|component| (component.id.as_str(), graph.add_node(component.id.as_str())))
        .collect();

    for connection in &snapshot.connections {
        if let (Some(&source), Some(&target)) = (
            nodes.get(connection.source_id.as_str()),
            nodes.get(connection.target_id.as_str()),
        ) {
            graph.add_edge(source, target, ());
        }
    }

    is_cyclic_directed(&graph)
}
