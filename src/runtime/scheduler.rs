/// Simulation tick scheduler
///
/// Drives the execution simulator from a repeated tokio-cron-scheduler job.
/// The job reads the latest published graph snapshot on every tick, so graph
/// edits between ticks are picked up by the next one. Stopping flips the
/// simulator to Stopped under its lock before the job is removed; a tick that
/// already holds the lock finishes, later ones are no-ops.

use crate::{
    runtime::simulator::{ExecutionSimulator, LogEntry, SimulatorState},
    workflow::{registry::ComponentRegistry, types::GraphSnapshot},
};
use anyhow::Result;
use arc_swap::ArcSwap;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tokio::sync::{Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Simulator state as reported to the log viewer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorStatus {
    pub state: SimulatorState,
    pub ticks: u64,
    pub tick_interval_secs: u64,
    pub log: Vec<LogEntry>,
}

pub struct SimulationScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    /// Handle of the repeated tick job while running
    job: Mutex<Option<Uuid>>,
    simulator: Arc<Mutex<ExecutionSimulator>>,
    snapshot: Arc<ArcSwap<GraphSnapshot>>,
    registry: Arc<ComponentRegistry>,
    interval: Duration,
}

impl SimulationScheduler {
    /// Create and start the underlying job scheduler; the simulator starts Stopped
    pub async fn new(
        simulator: ExecutionSimulator,
        snapshot: Arc<ArcSwap<GraphSnapshot>>,
        registry: Arc<ComponentRegistry>,
        interval: Duration,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        scheduler.start().await?;

        tracing::info!("⏰ Simulation scheduler ready (tick every {:?})", interval);

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            job: Mutex::new(None),
            simulator: Arc::new(Mutex::new(simulator)),
            snapshot,
            registry,
            interval,
        })
    }

    /// Start ticking. Returns false when the simulator was already running.
    pub async fn start(&self) -> Result<bool> {
        let mut job_handle = self.job.lock().await;
        if self.simulator.lock().await.is_running() {
            return Ok(false);
        }

        let simulator = Arc::clone(&self.simulator);
        let snapshot = Arc::clone(&self.snapshot);
        let registry = Arc::clone(&self.registry);

        let job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let simulator = Arc::clone(&simulator);
            let snapshot = Arc::clone(&snapshot);
            let registry = Arc::clone(&registry);

            Box::pin(async move {
                let current = snapshot.load_full();
                let appended = simulator.lock().await.tick(&current, &registry);
                tracing::debug!("🔔 Scheduled simulator tick appended {} entries", appended);
            })
        })?;

        let job_uuid = {
            let scheduler = self.scheduler.read().await;
            scheduler.add(job).await?
        };
        *job_handle = Some(job_uuid);
        self.simulator.lock().await.start();

        tracing::info!("🚀 Simulation started ({})", job_uuid);
        Ok(true)
    }

    /// Stop ticking. Returns false when the simulator was already stopped.
    pub async fn stop(&self) -> Result<bool> {
        let mut job_handle = self.job.lock().await;
        let stopped = self.simulator.lock().await.stop();

        if let Some(job_uuid) = job_handle.take() {
            let scheduler = self.scheduler.read().await;
            if let Err(e) = scheduler.remove(&job_uuid).await {
                tracing::warn!("⚠️ Failed to remove simulator job {}: {}", job_uuid, e);
            } else {
                tracing::debug!("🛑 Removed simulator job {}", job_uuid);
            }
        }

        Ok(stopped)
    }

    /// Run one tick immediately against the latest snapshot
    pub async fn tick_now(&self) -> usize {
        let current = self.snapshot.load_full();
        self.simulator.lock().await.tick(&current, &self.registry)
    }

    pub async fn clear_log(&self) {
        self.simulator.lock().await.clear_log();
    }

    pub async fn status(&self) -> SimulatorStatus {
        let simulator = self.simulator.lock().await;
        SimulatorStatus {
            state: simulator.state(),
            ticks: simulator.ticks(),
            tick_interval_secs: self.interval.as_secs(),
            log: simulator.log_entries(),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.simulator.lock().await.is_running()
    }

    /// Stop the simulation and tear down the job scheduler (session end)
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("⏹️ Shutting down simulation scheduler");
        self.stop().await?;

        let mut scheduler = self.scheduler.write().await;
        scheduler.shutdown().await?;

        tracing::info!("✅ Simulation scheduler stopped");
        Ok(())
    }
}
