/// Shared application state handed to every route handler

use crate::{
    integrations::{DiscordNotifier, EventLog, Notifier, TradingBackend},
    runtime::SimulationScheduler,
    session::BuilderSession,
    workflow::{registry::ComponentRegistry, storage::WorkflowStorage, template::TemplateCatalog},
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    /// Canonical component catalog
    pub registry: Arc<ComponentRegistry>,
    /// The single editing session (single-user model)
    pub session: Arc<Mutex<BuilderSession>>,
    /// Tick scheduler reading the session's published snapshot
    pub simulator: Arc<SimulationScheduler>,
    pub templates: Arc<TemplateCatalog>,
    /// Saved canvases
    pub storage: WorkflowStorage,
    pub trading: Arc<dyn TradingBackend>,
    pub notifier: Arc<dyn Notifier>,
    /// Used to test webhooks other than the configured one
    pub discord: DiscordNotifier,
    pub event_log: Arc<dyn EventLog>,
}
