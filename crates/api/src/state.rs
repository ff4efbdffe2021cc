use std::sync::Arc;

use agentdeck_core::registry::JobRegistry;

use crate::config::ServerConfig;
use crate::engine::JobDispatcher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Submits agent runs onto the worker pool.
    pub dispatcher: Arc<JobDispatcher>,
    /// Job records, polled by the jobs endpoints and dashboard.
    pub registry: Arc<JobRegistry>,
}

impl AppState {
    /// Build state around a dispatcher, sharing its registry.
    pub fn new(config: ServerConfig, dispatcher: JobDispatcher) -> Self {
        let registry = Arc::clone(dispatcher.registry());
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            registry,
        }
    }
}
