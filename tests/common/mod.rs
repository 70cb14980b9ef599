#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use hypereasy::{
    api::AppState,
    config::Config,
    integrations::{ActivityEvent, ActivityRecord, EventLog, Notification, Notifier, NotifyOutcome},
    server::{app_router, build_state},
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Notifier that remembers what it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
    pub outcome: Option<NotifyOutcome>,
}

impl RecordingNotifier {
    pub fn failing(reason: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outcome: Some(NotifyOutcome::Failed {
                reason: reason.to_string(),
            }),
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> NotifyOutcome {
        self.sent.lock().unwrap().push(notification.clone());
        self.outcome.clone().unwrap_or(NotifyOutcome::Delivered)
    }
}

/// In-memory event log
#[derive(Default)]
pub struct MemoryEventLog {
    pub events: Mutex<Vec<ActivityEvent>>,
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn record(&self, event: ActivityEvent) {
        self.events.lock().unwrap().push(event);
    }

    async fn recent(&self, limit: u32) -> anyhow::Result<Vec<ActivityRecord>> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .rev()
            .take(limit as usize)
            .enumerate()
            .map(|(i, event)| ActivityRecord {
                id: i.to_string(),
                event: event.clone(),
                created_at: Utc::now(),
            })
            .collect())
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.database.data_dir = dir.path().to_string_lossy().into_owned();
    config.simulator.tick_interval_secs = 3600;
    config.simulator.log_capacity = 10;
    config.notifications.discord_webhook_url = None;
    config
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the full router on an ephemeral port with a recording notifier
pub async fn spawn_app() -> TestApp {
    spawn_app_with(RecordingNotifier::default()).await
}

pub async fn spawn_app_with(notifier: RecordingNotifier) -> TestApp {
    let dir = TempDir::new().unwrap();
    let mut state = build_state(&test_config(&dir)).await.unwrap();
    let notifier = Arc::new(notifier);
    state.notifier = notifier.clone() as Arc<dyn Notifier>;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        state,
        notifier,
        _dir: dir,
    }
}
