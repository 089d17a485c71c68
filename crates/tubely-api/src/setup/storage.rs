//! Storage setup and initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = storage.bucket(),
        presign_ttl_secs = config.presign_ttl_secs,
        "Storage initialized successfully"
    );

    Ok(storage)
}
