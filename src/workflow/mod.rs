/// Workflow Builder Layer
///
/// This module holds the in-memory workflow model edited by the builder:
/// - Component instances, connections and snapshots
/// - The canonical component registry and built-in catalog
/// - Graph mutations with structural validation
/// - The interactive wiring protocol
/// - Template loading and structural analysis

// Core workflow type definitions
pub mod types;

// Component type registry and config schema validation
pub mod registry;

// Built-in component types and templates
pub mod catalog;

// Graph of placed components and connections
pub mod graph;

// Two-phase connection wiring state machine
pub mod wiring;

// Template definitions and the loader
pub mod template;

// Summaries and cycle detection
pub mod analysis;

// SQLite persistence for saved canvases
pub mod storage;

// Re-export commonly used types
pub use analysis::WorkflowSummary;
pub use graph::WorkflowGraph;
pub use registry::{ComponentRegistry, ComponentTier, ComponentType};
pub use template::{TemplateCatalog, TemplateDefinition, TemplateLoader};
pub use types::{ComponentInstance, ComponentPatch, Connection, GraphSnapshot, Position};
pub use wiring::{ConnectionBuilder, HostSignal, WiringState};
