//! Job records and their lifecycle states.
//!
//! A job is one invocation of an agent. It is created `running` and moves
//! exactly once to either `completed` or `failed`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::overrides::Overrides;
use crate::types::{JobId, Timestamp};

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Returns `true` for `completed` and `failed`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome reported by a worker.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The agent returned a result payload.
    Completed(serde_json::Value),
    /// The agent failed; the string is a human-readable description.
    Failed(String),
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Completed(_) => JobStatus::Completed,
            JobOutcome::Failed(_) => JobStatus::Failed,
        }
    }
}

/// Snapshot of a single job as held by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub id: JobId,
    pub agent_name: String,
    pub overrides: Overrides,
    pub status: JobStatus,
    /// Present only when `status` is `completed`.
    pub result: Option<serde_json::Value>,
    /// Present only when `status` is `failed`.
    pub error: Option<String>,
    pub created_at: Timestamp,
    /// Set once a worker slot picks the job up.
    pub started_at: Option<Timestamp>,
    /// Set only by the terminal transition.
    pub finished_at: Option<Timestamp>,
}

impl JobRecord {
    pub(crate) fn new(id: JobId, agent_name: String, overrides: Overrides) -> Self {
        Self {
            id,
            agent_name,
            overrides,
            status: JobStatus::Running,
            result: None,
            error: None,
            created_at: chrono::Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Whether the job currently occupies a worker slot.
    pub fn is_executing(&self) -> bool {
        self.status == JobStatus::Running && self.started_at.is_some()
    }
}
