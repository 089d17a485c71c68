//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tubely_core::{AppError, StorageLocation};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Every operation is a single attempt; callers decide whether to retry.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket new objects are written to.
    fn bucket(&self) -> &str;

    /// Upload the local file at `path` to `location`.
    ///
    /// The file is streamed, never read fully into memory.
    async fn put_file(
        &self,
        location: &StorageLocation,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Mint a time-limited GET URL for `location`.
    async fn presign_get(
        &self,
        location: &StorageLocation,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Plain (unsigned) URL of `location`.
    fn public_url(&self, location: &StorageLocation) -> String;

    async fn delete(&self, location: &StorageLocation) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
