/// Interactive wiring protocol
///
/// Two-phase state machine turning a port pick on a source component and a
/// port pick on a target component into one validated connection.

use crate::error::{BuilderError, Result};
use crate::workflow::graph::WorkflowGraph;
use crate::workflow::types::Connection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WiringState {
    #[default]
    Idle,
    Pending {
        #[serde(rename = "sourceId")]
        source_id: String,
        #[serde(rename = "sourceOutput")]
        source_output: String,
    },
}

/// Host UI events that must abort a pending wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSignal {
    BackgroundClick,
    Escape,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionBuilder {
    state: WiringState,
}

impl ConnectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WiringState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, WiringState::Pending { .. })
    }

    /// Source id of the pending wire, if any
    pub fn pending_source(&self) -> Option<&str> {
        match &self.state {
            WiringState::Pending { source_id, .. } => Some(source_id),
            WiringState::Idle => None,
        }
    }

    /// Pick the source port. A component that cannot emit leaves the builder Idle.
    ///
    /// Starting again while Pending replaces the pending source.
    pub fn start_connection(
        &mut self,
        graph: &WorkflowGraph,
        component_id: &str,
        output_port: &str,
    ) -> Result<()> {
        let can_emit = match graph.component_type(component_id) {
            Some(component_type) => component_type.can_emit_output,
            None => {
                self.state = WiringState::Idle;
                return Err(BuilderError::UnknownComponent(component_id.to_string()));
            }
        };

        if !can_emit {
            self.state = WiringState::Idle;
            tracing::debug!("Refusing to start a wire from {}", component_id);
            return Err(BuilderError::NotEmittable(component_id.to_string()));
        }

        tracing::debug!("Wire pending from {}.{}", component_id, output_port);
        self.state = WiringState::Pending {
            source_id: component_id.to_string(),
            source_output: output_port.to_string(),
        };
        Ok(())
    }

    /// Pick the target port and create the connection
    ///
    /// The builder is Idle afterwards whether or not the connection was created.
    pub fn complete_connection(
        &mut self,
        graph: &mut WorkflowGraph,
        target_id: &str,
        input_port: &str,
    ) -> Result<Connection> {
        let (source_id, source_output) = match std::mem::take(&mut self.state) {
            WiringState::Pending {
                source_id,
                source_output,
            } => (source_id, source_output),
            WiringState::Idle => return Err(BuilderError::NoPendingConnection),
        };

        if source_id == target_id {
            tracing::debug!("Wire from {} dropped onto itself", source_id);
            return Err(BuilderError::SelfLoop(source_id));
        }

        let result = graph.add_connection(&source_id, target_id, &source_output, input_port);
        if let Err(e) = &result {
            tracing::debug!("Wire {} -> {} rejected: {}", source_id, target_id, e);
        }
        result
    }

    /// Discard any pending wire. Always succeeds.
    pub fn cancel_connection(&mut self) {
        if self.is_pending() {
            tracing::debug!("Pending wire cancelled");
        }
        self.state = WiringState::Idle;
    }

    pub fn handle_host_signal(&mut self, signal: HostSignal) {
        tracing::debug!("Host signal {:?}", signal);
        self.cancel_connection();
    }
}
