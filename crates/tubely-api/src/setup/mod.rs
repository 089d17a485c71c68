//! Application setup and initialization

pub mod database;
pub mod processing;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;

use crate::services::upload::UploadPipeline;
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_video_repository(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let (inspector, remuxer) = processing::setup_processing(&config);

    let pipeline = UploadPipeline::new(&config, videos.clone(), storage.clone(), inspector, remuxer);

    let state = Arc::new(AppState {
        config: config.clone(),
        videos,
        storage,
        pipeline: Arc::new(pipeline),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
