//! In-memory job registry.
//!
//! The registry is the single owner of every [`JobRecord`]. Callers receive
//! cloned snapshots; mutation goes through [`JobRegistry::mark_started`] and
//! [`JobRegistry::update`]. Records are never removed and do not survive a
//! process restart.

use indexmap::IndexMap;
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::job::{JobOutcome, JobRecord, JobStatus};
use crate::overrides::Overrides;
use crate::types::JobId;

/// Thread-safe store of job records in insertion order.
///
/// Designed to be wrapped in `Arc` and shared between the dispatcher's
/// worker tasks and request handlers. Every operation takes the same lock.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<IndexMap<JobId, JobRecord>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new `running` record and return its fresh identifier.
    pub async fn create(&self, agent_name: &str, overrides: Overrides) -> JobId {
        debug_assert!(!agent_name.is_empty(), "agent name must not be empty");

        let mut jobs = self.jobs.lock().await;
        let mut id = JobId::new_v4();
        while jobs.contains_key(&id) {
            id = JobId::new_v4();
        }
        jobs.insert(id, JobRecord::new(id, agent_name.to_string(), overrides));
        id
    }

    /// Record that a worker slot has picked the job up.
    pub async fn mark_started(&self, id: JobId) -> Result<(), CoreError> {
        let mut jobs = self.jobs.lock().await;
        let record = jobs.get_mut(&id).ok_or_else(|| CoreError::job_not_found(id))?;

        if record.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                id,
                status: record.status,
            });
        }
        record.started_at = Some(chrono::Utc::now());
        Ok(())
    }

    /// Move a `running` job to its terminal state.
    ///
    /// Returns [`CoreError::NotFound`] for an unknown id and
    /// [`CoreError::InvalidTransition`] when the job is already terminal.
    pub async fn update(&self, id: JobId, outcome: JobOutcome) -> Result<JobStatus, CoreError> {
        let mut jobs = self.jobs.lock().await;
        let record = jobs.get_mut(&id).ok_or_else(|| CoreError::job_not_found(id))?;

        if record.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                id,
                status: record.status,
            });
        }

        let status = outcome.status();
        match outcome {
            JobOutcome::Completed(result) => record.result = Some(result),
            JobOutcome::Failed(error) => record.error = Some(error),
        }
        record.status = status;
        record.finished_at = Some(chrono::Utc::now());
        Ok(status)
    }

    pub async fn get(&self, id: JobId) -> Result<JobRecord, CoreError> {
        self.jobs
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::job_not_found(id))
    }

    /// Snapshot of every job in creation order.
    pub async fn list(&self) -> Vec<JobRecord> {
        self.jobs.lock().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn count_by_status(&self, status: JobStatus) -> usize {
        self.jobs
            .lock()
            .await
            .values()
            .filter(|job| job.status == status)
            .count()
    }
}
