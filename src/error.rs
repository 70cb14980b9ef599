/// Error taxonomy for the workflow builder core
///
/// Graph, wiring and template operations are synchronous and hand failures back
/// to the caller as `BuilderError` values. Infrastructure layers (storage,
/// scheduler, HTTP) keep using `anyhow` and convert at their boundary.

use crate::workflow::types::PortDirection;
use thiserror::Error;

/// Result alias used by every core builder operation
pub type Result<T> = std::result::Result<T, BuilderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// The type id is not part of the component registry
    #[error("Unknown component type: '{0}'")]
    UnknownComponentType(String),

    /// No component with this id is placed on the graph
    #[error("Unknown component: '{0}'")]
    UnknownComponent(String),

    /// Source and target of a connection are the same component
    #[error("Component '{0}' cannot be connected to itself")]
    SelfLoop(String),

    /// Source cannot emit output or target cannot accept input
    #[error("Component '{component_id}' (type '{type_id}') cannot {direction}")]
    PortCapabilityViolation {
        component_id: String,
        type_id: String,
        direction: PortDirection,
    },

    /// A wire was started from a component that has no output
    #[error("Component '{0}' has no output to start a connection from")]
    NotEmittable(String),

    /// `complete_connection` was called while no wire was pending
    #[error("No connection is pending")]
    NoPendingConnection,

    /// Upsert of an unknown id without a type id to create it from
    #[error("Cannot create component '{0}': the update does not name a type id")]
    IncompleteInsert(String),

    /// A restored snapshot lists the same component id twice
    #[error("Component id '{0}' is already present in the graph")]
    DuplicateComponent(String),

    /// A restored snapshot lists the same connection id twice
    #[error("Connection id '{0}' is already present in the graph")]
    DuplicateConnection(String),

    /// A template edge names a type id that none of the template slots use
    #[error("Template edge '{from}' -> '{to}' references a type that is not among the template slots")]
    TemplateEdgeUnresolved { from: String, to: String },
}

impl BuilderError {
    /// Stable machine-readable code for API responses and diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            BuilderError::UnknownComponentType(_) => "unknown_component_type",
            BuilderError::UnknownComponent(_) => "unknown_component",
            BuilderError::SelfLoop(_) => "self_loop",
            BuilderError::PortCapabilityViolation { .. } => "port_capability_violation",
            BuilderError::NotEmittable(_) => "not_emittable",
            BuilderError::NoPendingConnection => "no_pending_connection",
            BuilderError::IncompleteInsert(_) => "incomplete_insert",
            BuilderError::DuplicateComponent(_) => "duplicate_component",
            BuilderError::DuplicateConnection(_) => "duplicate_connection",
            BuilderError::TemplateEdgeUnresolved { .. } => "template_edge_unresolved",
        }
    }
}
