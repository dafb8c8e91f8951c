// Copyright 2025 Schedsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation API entry point.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use simulation_api::backend::HttpSchedulerBackend;
use simulation_api::config::Settings;
use simulation_api::state::AppState;
use simulation_api::store::InMemoryResultStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("simulation_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::load().context("failed to load settings")?;
    info!(
        backend_url = %settings.backend_url,
        bind_addr = %settings.bind_addr,
        "starting simulation API"
    );

    let backend = HttpSchedulerBackend::new(&settings).context("failed to build backend client")?;
    let store = InMemoryResultStore::new(settings.store_capacity);
    let state = Arc::new(AppState::new(
        settings.clone(),
        Arc::new(backend),
        Arc::new(store),
    ));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    axum::serve(listener, simulation_api::app(state))
        .await
        .context("server error")?;

    Ok(())
}
