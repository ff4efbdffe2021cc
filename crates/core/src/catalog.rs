//! Static agent catalog.
//!
//! The catalog is fixed at startup: it is either loaded from a JSON file or
//! falls back to [`AgentCatalog::builtin`]. Entries keep their declaration
//! order so listings are stable.
//!
//! ```json
//! [
//!   { "name": "echo", "description": "Echo overrides back.",
//!     "supports_overrides": true, "reusable": true, "kind": "echo" },
//!   { "name": "risk", "description": "Risk management guardrails.",
//!     "kind": "command", "program": "python", "args": ["-m", "src.agents.risk_agent"] }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::executors::{CommandAgent, EchoAgent};

/// Maximum length of an agent name.
const MAX_NAME_LEN: usize = 64;

/// How an agent is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AgentKind {
    /// Built-in [`EchoAgent`].
    Echo,
    /// External program run through [`CommandAgent`].
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        working_directory: Option<String>,
    },
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether callers may pass overrides to this agent.
    #[serde(default)]
    pub supports_overrides: bool,
    /// Whether one instance may be shared across runs.
    #[serde(default)]
    pub reusable: bool,
    #[serde(flatten)]
    pub kind: AgentKind,
}

impl AgentSpec {
    /// Construct a fresh executor for this entry.
    pub fn build(&self) -> Arc<dyn Agent> {
        match &self.kind {
            AgentKind::Echo => Arc::new(EchoAgent),
            AgentKind::Command {
                program,
                args,
                working_directory,
            } => Arc::new(CommandAgent::new(
                program.clone(),
                args.clone(),
                working_directory.clone(),
            )),
        }
    }
}

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read agent catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse agent catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid agent catalog: {0}")]
    Invalid(String),
}

/// Read-only set of agents known to the dispatcher.
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    entries: Vec<AgentSpec>,
}

impl AgentCatalog {
    /// Build a catalog from entries, validating names and commands.
    pub fn new(entries: Vec<AgentSpec>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for spec in &entries {
            validate_name(&spec.name)?;
            if !seen.insert(spec.name.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "Duplicate agent name: \"{}\"",
                    spec.name
                )));
            }
            if let AgentKind::Command { program, .. } = &spec.kind {
                if program.trim().is_empty() {
                    return Err(CatalogError::Invalid(format!(
                        "Agent \"{}\" has an empty program",
                        spec.name
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    /// Parse a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Catalog used when no file is configured: a single `echo` agent.
    pub fn builtin() -> Self {
        Self {
            entries: vec![AgentSpec {
                name: "echo".into(),
                description: "Echoes its overrides back as the job result.".into(),
                supports_overrides: true,
                reusable: true,
                kind: AgentKind::Echo,
            }],
        }
    }

    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.is_empty() {
        return Err(CatalogError::Invalid(
            "Agent name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CatalogError::Invalid(format!(
            "Agent name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CatalogError::Invalid(format!(
            "Agent name \"{name}\" may only contain alphanumeric, hyphen, or underscore characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
