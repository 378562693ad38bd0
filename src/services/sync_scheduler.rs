// src/services/sync_scheduler.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::services::CatalogSyncService;

/// Unique name of the startup catalog sync job.
pub const INITIAL_SYNC_JOB: &str = "initial_data_sync";

/// Observable lifecycle of a scheduled sync job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Enqueued,
    Running,
    Succeeded,
    Failed(String),
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed(_) | JobState::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Base delay between attempts, scaled linearly by attempt number.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(10),
        }
    }
}

struct JobHandle {
    handle: JoinHandle<()>,
    state_tx: watch::Sender<JobState>,
    state_rx: watch::Receiver<JobState>,
}

/// Runs catalog syncs as named background jobs with single-flight
/// semantics: enqueueing a name that is already in flight aborts the old
/// run and replaces it, so two syncs never race over the store.
pub struct SyncScheduler {
    sync_service: Arc<CatalogSyncService>,
    jobs: Mutex<HashMap<String, JobHandle>>,
}

impl SyncScheduler {
    pub fn new(sync_service: Arc<CatalogSyncService>) -> Self {
        Self {
            sync_service,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Enqueues (or replaces) the named job and returns a receiver that
    /// tracks its state through to a terminal value.
    pub fn enqueue_unique(&self, name: &str, policy: RetryPolicy) -> watch::Receiver<JobState> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(old) = jobs.remove(name) {
            info!("replacing in-flight sync job '{}'", name);
            old.handle.abort();
            let _ = old.state_tx.send(JobState::Cancelled);
        }

        let (state_tx, state_rx) = watch::channel(JobState::Enqueued);
        let task_tx = state_tx.clone();
        let sync_service = Arc::clone(&self.sync_service);
        let job_name = name.to_string();

        let handle = tokio::spawn(async move {
            for attempt in 1..=policy.max_attempts.max(1) {
                let _ = task_tx.send(JobState::Running);
                match sync_service.run_sync().await {
                    Ok(report) => {
                        info!(
                            "sync job '{}' succeeded on attempt {} ({} cards)",
                            job_name, attempt, report.mapped
                        );
                        let _ = task_tx.send(JobState::Succeeded);
                        return;
                    }
                    Err(e) if attempt < policy.max_attempts => {
                        warn!(
                            "sync job '{}' attempt {} failed: {}, retrying",
                            job_name, attempt, e
                        );
                        tokio::time::sleep(policy.backoff * attempt).await;
                    }
                    Err(e) => {
                        warn!("sync job '{}' gave up after attempt {}: {}", job_name, attempt, e);
                        let _ = task_tx.send(JobState::Failed(e.to_string()));
                        return;
                    }
                }
            }
        });

        jobs.insert(
            name.to_string(),
            JobHandle {
                handle,
                state_tx,
                state_rx: state_rx.clone(),
            },
        );
        state_rx
    }

    /// Aborts the named job if it has not reached a terminal state.
    /// Returns whether anything was cancelled.
    pub fn cancel(&self, name: &str) -> bool {
        let jobs = self.jobs.lock().unwrap_or_else(|p| p.into_inner());
        match jobs.get(name) {
            Some(job) if !job.state_rx.borrow().is_terminal() => {
                job.handle.abort();
                let _ = job.state_tx.send(JobState::Cancelled);
                true
            }
            _ => false,
        }
    }

    pub fn job_state(&self, name: &str) -> Option<JobState> {
        let jobs = self.jobs.lock().unwrap_or_else(|p| p.into_inner());
        jobs.get(name).map(|job| job.state_rx.borrow().clone())
    }
}
