use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tubely_core::StorageLocation;

/// Local filesystem storage implementation
///
/// A bucket is a directory under `base_path`; objects are served from
/// `{base_url}/{bucket}/{key}`. There is no request signing, so presigned URLs are
/// the plain public URL.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/assets")
    /// * `bucket` - Directory under `base_path` that new objects are written to
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(base_path.join(&bucket))
            .await
            .map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    base_path.display(),
                    e
                ))
            })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            bucket,
        })
    }

    /// Resolve a location to a path inside `base_path`, rejecting traversal.
    fn location_to_path(&self, location: &StorageLocation) -> StorageResult<PathBuf> {
        for part in [location.bucket(), location.key()] {
            if part.contains("..") || part.starts_with('/') || part.contains('\\') {
                return Err(StorageError::InvalidKey(format!(
                    "Storage location contains invalid characters: {}",
                    location
                )));
            }
        }

        Ok(self.base_path.join(location.bucket()).join(location.key()))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_file(
        &self,
        location: &StorageLocation,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let target = self.location_to_path(location)?;
        self.ensure_parent_dir(&target).await?;

        let start = Instant::now();
        let size = fs::copy(path, &target).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to copy {} to {}: {}",
                path.display(),
                target.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %target.display(),
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn presign_get(
        &self,
        location: &StorageLocation,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        self.location_to_path(location)?;
        Ok(self.public_url(location))
    }

    fn public_url(&self, location: &StorageLocation) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            location.bucket(),
            location.key()
        )
    }

    async fn delete(&self, location: &StorageLocation) -> StorageResult<()> {
        let path = self.location_to_path(location)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(location.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
