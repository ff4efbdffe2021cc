use std::net::SocketAddr;
use std::sync::Arc;

use agentdeck_core::catalog::AgentCatalog;
use agentdeck_core::registry::JobRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentdeck_api::config::ServerConfig;
use agentdeck_api::engine::JobDispatcher;
use agentdeck_api::router::build_app_router;
use agentdeck_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agentdeck_api=debug,agentdeck_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        worker_pool_size = config.worker_pool_size,
        "Loaded server configuration",
    );

    // --- Agent catalog ---
    let catalog = match &config.agents_file {
        Some(path) => {
            AgentCatalog::from_file(path).expect("Failed to load agent catalog from AGENTS_FILE")
        }
        None => AgentCatalog::builtin(),
    };
    tracing::info!(
        agents = catalog.len(),
        source = config.agents_file.as_deref().unwrap_or("builtin"),
        "Agent catalog loaded",
    );

    // --- Engine ---
    let registry = Arc::new(JobRegistry::new());
    let dispatcher = JobDispatcher::new(catalog, registry, config.worker_pool_size);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );

    // --- Router ---
    let app = build_app_router(AppState::new(config, dispatcher));

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Jobs still in flight are abandoned with the process; their records
    // were never persisted.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
