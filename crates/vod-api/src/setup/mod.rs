//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vod_core::Config;

const SERVICE_NAME: &str = "vod-api";

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    vod_infra::init_telemetry(SERVICE_NAME, config.environment(), config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let document_store = database::setup_document_store(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, document_store, storage).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
