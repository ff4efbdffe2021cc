//! Background job dispatcher.
//!
//! Validates run requests against the [`AgentCatalog`], records the job in
//! the [`JobRegistry`] and hands execution to a bounded worker pool. The
//! caller gets the job id back immediately; the outcome only becomes
//! visible by polling the registry.
//!
//! The pool is a [`Semaphore`] with one permit per worker slot. Every job
//! gets its own Tokio task which waits for a permit, so submissions beyond
//! capacity queue up instead of being rejected.

use std::any::Any;
use std::sync::Arc;

use agentdeck_core::catalog::{AgentCatalog, AgentSpec};
use agentdeck_core::error::CoreError;
use agentdeck_core::job::{JobOutcome, JobStatus};
use agentdeck_core::overrides::{self, Overrides};
use agentdeck_core::registry::JobRegistry;
use agentdeck_core::types::JobId;
use serde::Serialize;
use tokio::sync::Semaphore;

use super::instances::{default_factory, AgentFactory, InstanceCache};

/// Default number of concurrently executing jobs.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Public view of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    pub name: String,
    pub description: String,
    pub supports_overrides: bool,
    pub reusable: bool,
    /// Whether a cached instance is currently live.
    pub warm: bool,
}

/// Runs catalog agents on a bounded worker pool.
pub struct JobDispatcher {
    catalog: Arc<AgentCatalog>,
    registry: Arc<JobRegistry>,
    instances: Arc<InstanceCache>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl JobDispatcher {
    /// Create a dispatcher that builds agents with [`AgentSpec::build`].
    pub fn new(catalog: AgentCatalog, registry: Arc<JobRegistry>, capacity: usize) -> Self {
        Self::with_factory(catalog, registry, capacity, default_factory())
    }

    /// Create a dispatcher with a custom agent factory.
    ///
    /// A `capacity` of zero is raised to one.
    pub fn with_factory(
        catalog: AgentCatalog,
        registry: Arc<JobRegistry>,
        capacity: usize,
        factory: AgentFactory,
    ) -> Self {
        let capacity = capacity.max(1);
        Self {
            catalog: Arc::new(catalog),
            registry,
            instances: Arc::new(InstanceCache::new(factory)),
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// List the catalog in declaration order.
    pub async fn list_agents(&self) -> Vec<AgentDescriptor> {
        let mut agents = Vec::with_capacity(self.catalog.len());
        for spec in self.catalog.iter() {
            agents.push(AgentDescriptor {
                name: spec.name.clone(),
                description: spec.description.clone(),
                supports_overrides: spec.supports_overrides,
                reusable: spec.reusable,
                warm: self.instances.is_warm(&spec.name).await,
            });
        }
        agents
    }

    /// Submit a run of agent `name` and return the new job id.
    ///
    /// Fails with [`CoreError::UnknownAgent`],
    /// [`CoreError::UnsupportedOverride`] or [`CoreError::Validation`] (see
    /// [`overrides::check_keys`]) before any record is created.
    /// Otherwise the job is `running` in the registry by the time this
    /// returns, whether or not a worker slot is free.
    pub async fn run(&self, name: &str, overrides: Overrides) -> Result<JobId, CoreError> {
        let spec = self
            .catalog
            .get(name)
            .ok_or_else(|| CoreError::UnknownAgent(name.to_string()))?;

        if !spec.supports_overrides && !overrides.is_empty() {
            return Err(CoreError::UnsupportedOverride(name.to_string()));
        }
        overrides::check_keys(&overrides)?;

        let id = self.registry.create(&spec.name, overrides.clone()).await;
        tracing::info!(
            job_id = %id,
            agent = %spec.name,
            overrides = overrides.len(),
            "Job submitted",
        );

        self.spawn_worker(id, spec.clone(), overrides);
        Ok(id)
    }

    fn spawn_worker(&self, id: JobId, spec: AgentSpec, overrides: Overrides) {
        let registry = Arc::clone(&self.registry);
        let instances = Arc::clone(&self.instances);
        let permits = Arc::clone(&self.permits);

        tokio::spawn(async move {
            // The semaphore is never closed, so this only waits for a slot.
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    let outcome = JobOutcome::Failed("Worker pool is closed".into());
                    record_outcome(&registry, id, outcome).await;
                    return;
                }
            };

            if let Err(e) = registry.mark_started(id).await {
                report_defect(id, &e);
                return;
            }
            tracing::info!(job_id = %id, agent = %spec.name, "Job started");

            let agent_name = spec.name.clone();
            // Run on a separate task so a panicking agent surfaces as a
            // `JoinError` here instead of tearing down the worker.
            let execution = tokio::spawn(async move {
                let agent = instances.get_or_create(&spec).await;
                agent.run(&overrides).await
            });

            let outcome = match execution.await {
                Ok(Ok(result)) => JobOutcome::Completed(result),
                Ok(Err(e)) => JobOutcome::Failed(non_empty(e.to_string(), &agent_name)),
                Err(join_err) if join_err.is_panic() => JobOutcome::Failed(format!(
                    "Agent '{agent_name}' panicked: {}",
                    panic_message(join_err.into_panic())
                )),
                Err(join_err) => {
                    JobOutcome::Failed(format!("Agent '{agent_name}' was aborted: {join_err}"))
                }
            };

            record_outcome(&registry, id, outcome).await;
        });
    }
}

/// Perform the terminal update and log it.
async fn record_outcome(registry: &JobRegistry, id: JobId, outcome: JobOutcome) {
    let error = match &outcome {
        JobOutcome::Failed(error) => Some(error.clone()),
        JobOutcome::Completed(_) => None,
    };

    match registry.update(id, outcome).await {
        Ok(JobStatus::Failed) => {
            tracing::warn!(job_id = %id, error = error.as_deref().unwrap_or_default(), "Job failed");
        }
        Ok(status) => tracing::info!(job_id = %id, %status, "Job finished"),
        Err(e) => report_defect(id, &e),
    }
}

/// A registry rejection from a worker means the dispatcher itself is
/// broken: each job has exactly one worker and one terminal write.
fn report_defect(id: JobId, error: &CoreError) {
    tracing::error!(job_id = %id, error = %error, "Job state invariant violated");
    debug_assert!(false, "job state invariant violated for {id}: {error}");
}

fn non_empty(message: String, agent_name: &str) -> String {
    if message.trim().is_empty() {
        format!("Agent '{agent_name}' failed without an error message")
    } else {
        message
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
