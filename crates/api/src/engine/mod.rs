//! Job execution engine.
//!
//! Contains the dispatcher that validates run requests and executes agents
//! on a bounded worker pool, plus the cache of reusable agent instances.

pub mod dispatcher;
pub mod instances;

pub use dispatcher::{AgentDescriptor, JobDispatcher};
