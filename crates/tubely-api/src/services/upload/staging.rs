//! Request-scoped local staging of uploaded files.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tubely_core::constants::STAGING_DIR_PREFIX;
use tubely_core::AppError;

/// Root under which every pipeline invocation gets its own directory.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Copy `body` into a fresh staging directory as `file_name`.
    ///
    /// Fails with `PayloadTooLarge` as soon as more than `max_bytes` arrive and with
    /// `BadRequest` for an empty body. On any failure the directory is removed.
    pub async fn stage<S>(
        &self,
        mut body: S,
        file_name: &str,
        max_bytes: u64,
    ) -> Result<StagedUpload, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Unpin,
    {
        tokio::fs::create_dir_all(&self.root).await?;

        let root = self.root.clone();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(STAGING_DIR_PREFIX)
                .tempdir_in(root)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Staging task failed: {}", e)))??;

        let path = dir.path().join(file_name);
        let mut staged = StagedUpload {
            dir: Some(dir),
            path,
            size_bytes: 0,
        };

        let mut file = tokio::fs::File::create(&staged.path).await?;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            staged.size_bytes += chunk.len() as u64;
            if staged.size_bytes > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "File exceeds the maximum size of {} bytes",
                    max_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        if staged.size_bytes == 0 {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        tracing::debug!(
            path = %staged.path.display(),
            size_bytes = staged.size_bytes,
            "Upload staged"
        );

        Ok(staged)
    }
}

/// A staged file and the directory holding it and everything derived from it.
///
/// Dropping it removes the directory; [`StagedUpload::cleanup`] does the same off the
/// async runtime and logs failures.
#[derive(Debug)]
pub struct StagedUpload {
    dir: Option<TempDir>,
    path: PathBuf,
    size_bytes: u64,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub async fn cleanup(mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let dir_path = dir.path().to_path_buf();

        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => {
                tracing::debug!(path = %dir_path.display(), "Staging directory removed");
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    path = %dir_path.display(),
                    "Failed to remove staging directory"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %dir_path.display(),
                    "Staging cleanup task failed"
                );
            }
        }
    }
}
