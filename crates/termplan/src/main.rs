//! termplan service binary.
//!
//! Boots the persisted session, restores controller state, and serves the
//! planner API in front of the external schedule solver.

mod config;
mod controller;
mod grid;
mod server;
mod session;
mod solver;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::controller::PlannerController;
use crate::session::SqliteSessionStore;
use crate::solver::SolverClient;
use crate::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = std::env::var("TERMPLAN_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = AppConfig::resolve(&config_path);

    let store = Arc::new(
        SqliteSessionStore::new(&config.storage.db_path)
            .context("Failed to open session database")?,
    );
    let controller = PlannerController::new(store);
    controller.restore();

    let solver = SolverClient::new(&config.solver).context("Failed to build solver client")?;

    let state = Arc::new(AppState {
        config,
        solver,
        controller,
    });

    let addr = format!(
        "{}:{}",
        state.config.server.address, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, server::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
