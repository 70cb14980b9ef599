/// HyperEasy: no-code workflow builder for Hyperliquid
///
/// This library provides the builder core (component registry, workflow graph,
/// interactive wiring, templates), the execution simulator and an axum HTTP
/// shell over a single editing session.

// Core configuration and setup
pub mod config;

// Builder error taxonomy
pub mod error;

// Workflow builder layer - registry, graph, wiring, templates, storage
pub mod workflow;

// Runtime layer - execution simulator and its tick scheduler
pub mod runtime;

// Editing session tying graph, wiring and preferences together
pub mod session;

// External collaborators - trading backend, notifications, activity log
pub mod integrations;

// SQLite database and activity log
pub mod persistence;

// HTTP API layer
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use error::BuilderError;
pub use runtime::{ExecutionSimulator, SimulationScheduler};
pub use session::BuilderSession;
pub use workflow::{ComponentRegistry, TemplateLoader, WorkflowGraph};
pub use server::start_server;
