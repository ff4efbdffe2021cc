//! The agent execution boundary.
//!
//! An agent is an opaque unit of work invoked with a set of overrides. The
//! dispatcher never looks inside: it only sees a result payload or an
//! [`AgentError`].

use async_trait::async_trait;

use crate::overrides::Overrides;

/// Errors an agent invocation can produce.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Failed to spawn agent process: {0}")]
    Spawn(std::io::Error),

    #[error("I/O error while running agent: {0}")]
    Io(#[from] std::io::Error),

    #[error("Agent exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Agent terminated by signal")]
    Terminated,

    #[error("{0}")]
    Failed(String),
}

/// A single invocable agent.
///
/// Implementations must be `Send + Sync` because the dispatcher may share
/// one instance between concurrent jobs when the catalog marks the agent
/// reusable. Overrides apply to the one call they are passed to.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run the agent once and return its result payload.
    async fn run(&self, overrides: &Overrides) -> Result<serde_json::Value, AgentError>;
}
