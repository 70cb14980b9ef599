/// Execution simulator
///
/// Approximates what a workflow would do if it ran, without side effects.
/// Each tick walks one hop from every simulation trigger to its directly
/// connected components and appends log lines for them. Because only one hop
/// is ever followed, cyclic graphs cannot cause unbounded work.

use crate::workflow::registry::ComponentRegistry;
use crate::workflow::types::GraphSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Entries kept when no capacity is configured
pub const DEFAULT_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Simulator state machine with a bounded FIFO log
#[derive(Debug, Clone)]
pub struct ExecutionSimulator {
    state: SimulatorState,
    log: VecDeque<LogEntry>,
    capacity: usize,
    ticks: u64,
}

impl Default for ExecutionSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl ExecutionSimulator {
    /// A capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: SimulatorState::Stopped,
            log: VecDeque::with_capacity(capacity),
            capacity,
            ticks: 0,
        }
    }

    /// Stopped -> Running. Returns false when already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        tracing::info!("▶️ Simulator started");
        self.state = SimulatorState::Running;
        true
    }

    /// Running -> Stopped. Returns false when already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        tracing::info!("⏹️ Simulator stopped after {} ticks", self.ticks);
        self.state = SimulatorState::Stopped;
        true
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulatorState::Running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Log entries, oldest first
    pub fn log(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.iter().cloned().collect()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Run one evaluation step against `snapshot`
    ///
    /// Does nothing while stopped. Triggers are visited in component order and
    /// their targets in connection order; a connection whose target is gone or
    /// whose trigger type is unknown is skipped. Returns the number of entries
    /// appended.
    pub fn tick(&mut self, snapshot: &GraphSnapshot, registry: &ComponentRegistry) -> usize {
        if !self.is_running() {
            return 0;
        }
        self.ticks += 1;

        let mut appended = 0;
        for trigger in &snapshot.components {
            let is_trigger = registry
                .get(&trigger.type_id)
                .is_some_and(|component_type| component_type.is_simulation_trigger);
            if !is_trigger {
                continue;
            }

            let actions: Vec<&str> = snapshot
                .outgoing(&trigger.id)
                .filter_map(|connection| {
                    let target = snapshot.component(&connection.target_id);
                    if target.is_none() {
                        tracing::warn!(
                            "Connection {} points at missing component {}, skipping",
                            connection.id,
                            connection.target_id
                        );
                    }
                    target
                })
                .map(|target| target.display_name.as_str())
                .collect();
            if actions.is_empty() {
                continue;
            }

            self.append(format!("{} triggered", trigger.display_name));
            for action in &actions {
                self.append(format!("Executing {}", action));
            }
            appended += 1 + actions.len();
        }

        tracing::debug!("Simulator tick {} appended {} entries", self.ticks, appended);
        appended
    }

    fn append(&mut self, message: String) {
        if self.log.len() == self.capacity {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            timestamp: Utc::now(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::graph::WorkflowGraph;
    use crate::workflow::types::{Connection, DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT};
    use std::sync::Arc;

    fn messages(simulator: &ExecutionSimulator) -> Vec<String> {
        simulator.log().map(|entry| entry.message.clone()).collect()
    }

    fn wire(graph: &mut WorkflowGraph, source: &str, target: &str) {
        graph
            .add_connection(source, target, DEFAULT_OUTPUT_PORT, DEFAULT_INPUT_PORT)
            .unwrap();
    }

    /// Trigger T wired to actions A then B
    fn fan_out() -> (WorkflowGraph, Arc<ComponentRegistry>) {
        let registry = Arc::new(ComponentRegistry::builtin());
        let mut graph = WorkflowGraph::new(Arc::clone(&registry));
        let t = graph.add_component("price-alert", "T").unwrap();
        let a = graph.add_component("place-order", "A").unwrap();
        let b = graph.add_component("discord-webhook", "B").unwrap();
        wire(&mut graph, &t.id, &a.id);
        wire(&mut graph, &t.id, &b.id);
        (graph, registry)
    }

    #[test]
    fn repeated_ticks_repeat_the_same_pattern() {
        let (graph, registry) = fan_out();
        let snapshot = graph.snapshot();
        let mut simulator = ExecutionSimulator::new(30);
        simulator.start();

        for _ in 0..3 {
            assert_eq!(simulator.tick(&snapshot, &registry), 3);
        }

        let expected: Vec<String> = ["T triggered", "Executing A", "Executing B"]
            .iter()
            .cycle()
            .take(9)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(messages(&simulator), expected);
        assert_eq!(simulator.ticks(), 3);
    }

    #[test]
    fn log_keeps_only_the_most_recent_entries() {
        let (graph, registry) = fan_out();
        let snapshot = graph.snapshot();
        let mut simulator = ExecutionSimulator::default();
        simulator.start();

        // 4 ticks x 3 entries = 12 entries, the first two are evicted
        for _ in 0..4 {
            simulator.tick(&snapshot, &registry);
        }

        let log = messages(&simulator);
        assert_eq!(log.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(log[0], "Executing B");
        assert_eq!(log[1], "T triggered");
        assert_eq!(log[9], "Executing B");
    }

    #[test]
    fn stopped_simulator_does_not_tick() {
        let (graph, registry) = fan_out();
        let mut simulator = ExecutionSimulator::default();

        assert_eq!(simulator.tick(&graph.snapshot(), &registry), 0);
        simulator.start();
        simulator.tick(&graph.snapshot(), &registry);
        simulator.stop();
        assert_eq!(simulator.tick(&graph.snapshot(), &registry), 0);
        assert_eq!(simulator.log().count(), 3);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut simulator = ExecutionSimulator::default();
        assert!(!simulator.stop());
        assert!(simulator.start());
        assert!(!simulator.start());
        assert_eq!(simulator.state(), SimulatorState::Running);
        assert!(simulator.stop());
        assert!(!simulator.stop());
        assert_eq!(simulator.state(), SimulatorState::Stopped);
    }

    #[test]
    fn only_triggers_start_chains() {
        let registry = Arc::new(ComponentRegistry::builtin());
        let mut graph = WorkflowGraph::new(Arc::clone(&registry));
        let order = graph.add_component("place-order", "Order").unwrap();
        let notify = graph.add_component("discord-webhook", "Notify").unwrap();
        let lonely = graph.add_component("scheduler", "Lonely").unwrap();
        wire(&mut graph, &order.id, &notify.id);

        let mut simulator = ExecutionSimulator::default();
        simulator.start();
        // place-order emits output but is not a trigger; the scheduler has no targets
        assert_eq!(simulator.tick(&graph.snapshot(), &registry), 0);
        assert!(graph.contains_component(&lonely.id));
    }

    #[test]
    fn cycles_are_walked_one_hop() {
        let registry = Arc::new(ComponentRegistry::builtin());
        let mut graph = WorkflowGraph::new(Arc::clone(&registry));
        let feed = graph.add_component("market-data", "Feed").unwrap();
        let order = graph.add_component("place-order", "Order").unwrap();
        let vault = graph.add_component("vault-manager", "Vault").unwrap();
        wire(&mut graph, &feed.id, &order.id);
        wire(&mut graph, &order.id, &vault.id);
        wire(&mut graph, &vault.id, &order.id);

        let mut simulator = ExecutionSimulator::default();
        simulator.start();
        assert_eq!(simulator.tick(&graph.snapshot(), &registry), 2);
        assert_eq!(messages(&simulator), vec!["Feed triggered", "Executing Order"]);
    }

    #[test]
    fn dangling_targets_are_skipped() {
        let (graph, registry) = fan_out();
        let mut snapshot = graph.snapshot();
        let trigger_id = snapshot.components[0].id.clone();
        snapshot.connections.insert(
            0,
            Connection {
                id: "conn-stale".to_string(),
                source_id: trigger_id,
                target_id: "vanished".to_string(),
                source_output: DEFAULT_OUTPUT_PORT.to_string(),
                target_input: DEFAULT_INPUT_PORT.to_string(),
            },
        );

        let mut simulator = ExecutionSimulator::default();
        simulator.start();
        assert_eq!(simulator.tick(&snapshot, &registry), 3);
        assert_eq!(messages(&simulator), vec!["T triggered", "Executing A", "Executing B"]);
    }

    #[test]
    fn edits_between_ticks_are_picked_up() {
        let (mut graph, registry) = fan_out();
        let mut simulator = ExecutionSimulator::new(20);
        simulator.start();

        simulator.tick(&graph.snapshot(), &registry);
        let b_id = graph.components()[2].id.clone();
        graph.delete_component(&b_id);
        simulator.tick(&graph.snapshot(), &registry);

        assert_eq!(
            messages(&simulator),
            vec!["T triggered", "Executing A", "Executing B", "T triggered", "Executing A"]
        );
    }
}
