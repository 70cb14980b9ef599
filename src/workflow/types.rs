/// Core workflow type definitions
///
/// Defines placed component instances, the directed connections between them and
/// the read-only snapshot handed to renderers, storage and the simulator.
/// These types are serialized with camelCase keys for the canvas frontend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Port name used when a component exposes a single output
pub const DEFAULT_OUTPUT_PORT: &str = "output";

/// Port name used when a component exposes a single input
pub const DEFAULT_INPUT_PORT: &str = "input";

/// Free-form component configuration (option name -> value)
pub type ComponentConfig = Map<String, Value>;

/// Canvas coordinate of a component
///
/// Owned by the presentation layer. The core only stores it and passes it
/// through serialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Position {
    /// Drop point used when the caller does not supply one
    fn default() -> Self {
        Self { x: 100.0, y: 100.0 }
    }
}

/// A single component placed on the workflow canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    /// Unique id within the graph (e.g., "place-order-3f2a...")
    pub id: String,
    /// Registry type this instance was created from
    pub type_id: String,
    /// User-editable label, independent of the type's default name
    pub display_name: String,
    /// Stored configuration, validated lazily against the type's schema
    #[serde(default)]
    pub config: ComponentConfig,
    /// Canvas position (presentation metadata)
    #[serde(default)]
    pub position: Position,
}

/// Directed, named-port edge between two component instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub source_output: String,
    pub target_input: String,
}

/// Partial update for a component
///
/// Every field is independently optional. `type_id` is only consulted when an
/// upsert has to create the component; an existing component never changes type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ComponentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl ComponentPatch {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn config(config: ComponentConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }
}

/// Side of a connection a capability check applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Output,
    Input,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Output => write!(f, "emit output"),
            PortDirection::Input => write!(f, "accept input"),
        }
    }
}

/// Read-only export of a graph
///
/// Components and connections keep the graph's insertion order, which is the
/// iteration order the simulator relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub components: Vec<ComponentInstance>,
    pub connections: Vec<Connection>,
}

impl GraphSnapshot {
    /// Find a component by id
    pub fn component(&self, id: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|component| component.id == id)
    }

    /// Connections leaving `source_id`, in insertion order
    pub fn outgoing<'a>(&'a self, source_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |connection| connection.source_id == source_id)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.connections.is_empty()
    }
}
