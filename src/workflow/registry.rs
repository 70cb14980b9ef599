/// Component type registry
///
/// Static catalog mapping a component type id to its capabilities and default
/// configuration schema. Built once at startup and shared read-only (`Arc`)
/// between the graph, the template loader, the simulator and the API layer.

use crate::error::{BuilderError, Result};
use crate::workflow::types::{ComponentConfig, DEFAULT_INPUT_PORT, DEFAULT_OUTPUT_PORT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Grouping tag used by the component library UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentTier {
    /// General building blocks (orders, alerts, schedulers, notifications)
    Core,
    /// Hyperliquid-specific strategies and infrastructure
    Hyperliquid,
}

/// Value kind of a configuration option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    Number,
    String,
    Boolean,
    Select,
    Range,
}

/// One entry of a component type's configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOption {
    pub kind: ConfigKind,
    pub default: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ConfigOption {
    pub fn number(default: f64) -> Self {
        Self {
            kind: ConfigKind::Number,
            default: Value::from(default),
            options: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn range(default: f64, min: f64, max: f64) -> Self {
        Self {
            kind: ConfigKind::Range,
            default: Value::from(default),
            options: Vec::new(),
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn string(default: &str) -> Self {
        Self {
            kind: ConfigKind::String,
            default: Value::from(default),
            options: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn boolean(default: bool) -> Self {
        Self {
            kind: ConfigKind::Boolean,
            default: Value::from(default),
            options: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn select(default: &str, options: &[&str]) -> Self {
        Self {
            kind: ConfigKind::Select,
            default: Value::from(default),
            options: options.iter().map(|option| option.to_string()).collect(),
            min: None,
            max: None,
        }
    }

    /// Bound a number option
    pub fn between(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Check whether a stored value is usable for this option
    ///
    /// Numbers may arrive as numeric strings because form inputs store text.
    pub fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            ConfigKind::Number | ConfigKind::Range => {
                let number = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                match number {
                    Some(n) => {
                        self.min.map_or(true, |min| n >= min) && self.max.map_or(true, |max| n <= max)
                    }
                    None => false,
                }
            }
            ConfigKind::String => value.is_string(),
            ConfigKind::Boolean => value.is_boolean(),
            ConfigKind::Select => match value.as_str() {
                Some(choice) => self.options.is_empty() || self.options.iter().any(|o| o == choice),
                None => false,
            },
        }
    }
}

/// Registry entry describing one kind of component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentType {
    pub type_id: String,
    pub display_name: String,
    pub description: String,
    pub category: String,
    pub tier: ComponentTier,
    /// May be the source of a connection
    pub can_emit_output: bool,
    /// May be the target of a connection
    pub can_accept_input: bool,
    /// Fires trigger → action chains in the execution simulator.
    /// Independent of `can_emit_output`.
    pub is_simulation_trigger: bool,
    /// Named ports shown in the component library. Display-only: connections
    /// are checked against the capability flags, never against these lists,
    /// so any type may be wired on `"output"`/`"input"`.
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub config_schema: BTreeMap<String, ConfigOption>,
}

impl ComponentType {
    /// Create an entry with no capabilities and an empty schema
    pub fn new(type_id: &str, display_name: &str, category: &str, tier: ComponentTier) -> Self {
        Self {
            type_id: type_id.to_string(),
            display_name: display_name.to_string(),
            description: String::new(),
            category: category.to_string(),
            tier,
            can_emit_output: false,
            can_accept_input: false,
            is_simulation_trigger: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
            config_schema: BTreeMap::new(),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Expose the default `"output"` port
    pub fn emits(mut self) -> Self {
        self.can_emit_output = true;
        if self.outputs.is_empty() {
            self.outputs.push(DEFAULT_OUTPUT_PORT.to_string());
        }
        self
    }

    /// Expose the default `"input"` port
    pub fn accepts(mut self) -> Self {
        self.can_accept_input = true;
        if self.inputs.is_empty() {
            self.inputs.push(DEFAULT_INPUT_PORT.to_string());
        }
        self
    }

    /// Mark as a simulation trigger (implies an output)
    pub fn trigger(self) -> Self {
        let mut this = self.emits();
        this.is_simulation_trigger = true;
        this
    }

    /// Advertise named ports; a non-empty side enables the capability
    pub fn ports(mut self, inputs: &[&str], outputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|port| port.to_string()).collect();
        self.outputs = outputs.iter().map(|port| port.to_string()).collect();
        self.can_accept_input = !self.inputs.is_empty();
        self.can_emit_output = !self.outputs.is_empty();
        self
    }

    pub fn option(mut self, name: &str, option: ConfigOption) -> Self {
        self.config_schema.insert(name.to_string(), option);
        self
    }

    /// Resolve a stored configuration against the schema
    ///
    /// Schema keys with a missing or invalid value take the default. Keys the
    /// schema does not know about are passed through untouched. Nothing is
    /// written back to the component.
    pub fn resolve_config(&self, config: &ComponentConfig) -> ComponentConfig {
        let mut resolved = config.clone();
        for (name, option) in &self.config_schema {
            match config.get(name) {
                Some(value) if option.accepts(value) => {}
                Some(value) => {
                    tracing::debug!(
                        "Config '{}' of type '{}' has invalid value {}, using default",
                        name,
                        self.type_id,
                        value
                    );
                    resolved.insert(name.clone(), option.default.clone());
                }
                None => {
                    resolved.insert(name.clone(), option.default.clone());
                }
            }
        }
        resolved
    }
}

/// Read-only catalog of component types
///
/// Keeps registration order for listing and a hash index for lookups.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    types: Vec<ComponentType>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Build a registry from a list of types
    ///
    /// A repeated type id keeps its first registration.
    pub fn new(types: impl IntoIterator<Item = ComponentType>) -> Self {
        let mut registered = Vec::new();
        let mut index = HashMap::new();

        for component_type in types {
            if index.contains_key(&component_type.type_id) {
                tracing::warn!(
                    "Ignoring duplicate registration of component type '{}'",
                    component_type.type_id
                );
                continue;
            }
            index.insert(component_type.type_id.clone(), registered.len());
            registered.push(component_type);
        }

        tracing::debug!("Component registry initialized with {} types", registered.len());

        Self {
            types: registered,
            index,
        }
    }

    /// The canonical built-in catalog (core and Hyperliquid tiers)
    pub fn builtin() -> Self {
        Self::new(crate::workflow::catalog::builtin_component_types())
    }

    /// Look up a type, failing with `UnknownComponentType`
    pub fn lookup(&self, type_id: &str) -> Result<&ComponentType> {
        self.get(type_id)
            .ok_or_else(|| BuilderError::UnknownComponentType(type_id.to_string()))
    }

    pub fn get(&self, type_id: &str) -> Option<&ComponentType> {
        self.index.get(type_id).map(|&position| &self.types[position])
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.index.contains_key(type_id)
    }

    /// All types in registration order
    pub fn types(&self) -> &[ComponentType] {
        &self.types
    }

    pub fn by_tier(&self, tier: ComponentTier) -> impl Iterator<Item = &ComponentType> {
        self.types.iter().filter(move |component_type| component_type.tier == tier)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
