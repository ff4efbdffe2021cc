//! `agentdeck-core` -- domain types for the agent control plane.
//!
//! Holds the job model and in-memory [`registry::JobRegistry`], the
//! [`agent::Agent`] trait with its built-in executors, and the static
//! [`catalog::AgentCatalog`]. Has no HTTP or runtime wiring of its own.

pub mod agent;
pub mod catalog;
pub mod error;
pub mod executors;
pub mod job;
pub mod overrides;
pub mod registry;
pub mod types;
