/// Runtime Simulation Layer
///
/// This module turns a workflow graph into a simulated activity log:
/// - A synchronous simulator state machine with a bounded log
/// - A tokio-cron-scheduler job that ticks it at a fixed interval

// Trigger -> action one-hop simulator
pub mod simulator;

// Repeated tick job driving the simulator
pub mod scheduler;

// Re-export main types
pub use scheduler::{SimulationScheduler, SimulatorStatus};
pub use simulator::{ExecutionSimulator, LogEntry, SimulatorState};
