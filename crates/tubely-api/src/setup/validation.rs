//! Configuration validation
//!
//! Runs the config's own checks, then warns about settings that work but are unusual.

use anyhow::Result;
use tubely_core::{Config, StorageBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.storage_backend == StorageBackend::Local {
        tracing::warn!(
            "Local storage backend in production - presigned URLs are plain public URLs"
        );
    }

    if config.jwt_secret.len() < 32 {
        tracing::warn!("JWT_SECRET is shorter than 32 bytes");
    }

    if config.presign_ttl_secs > 7 * 24 * 3600 {
        tracing::warn!(
            presign_ttl_secs = config.presign_ttl_secs,
            "PRESIGN_TTL_SECS exceeds the 7 day maximum accepted by S3"
        );
    }

    Ok(())
}
