use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tubely_core::StorageLocation;

/// Connection settings for an S3 (or S3-compatible) endpoint.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (e.g. "http://localhost:9000" for MinIO)
    pub endpoint_url: Option<String>,
    /// Static credentials; when unset, credentials are resolved from the AWS environment.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    settings: S3Settings,
}

impl S3Storage {
    pub fn new(settings: S3Settings) -> StorageResult<Self> {
        let store = Self::build_store(&settings, &settings.bucket)?;
        Ok(S3Storage { store, settings })
    }

    fn build_store(settings: &S3Settings, bucket: &str) -> StorageResult<AmazonS3> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(settings.region.clone())
            .with_bucket_name(bucket.to_string());

        if let Some(ref endpoint) = settings.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        if let (Some(key_id), Some(secret)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            builder = builder
                .with_access_key_id(key_id.clone())
                .with_secret_access_key(secret.clone());
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    /// Store handle for `bucket`. Records written before a bucket change still
    /// reference their original bucket, so those get a dedicated client.
    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if bucket == self.settings.bucket {
            Ok(self.store.clone())
        } else {
            Self::build_store(&self.settings, bucket)
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> &str {
        &self.settings.bucket
    }

    async fn put_file(
        &self,
        location: &StorageLocation,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        let start = Instant::now();
        let store = self.store_for(location.bucket())?;

        let mut file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let store: Arc<dyn ObjectStore> = Arc::new(store);
        let mut writer = BufWriter::new(store, ObjectPath::from(location.key()))
            .with_attributes(attributes);

        let written = match tokio::io::copy(&mut file, &mut writer).await {
            Ok(_) => writer.shutdown().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    bucket = %location.bucket(),
                    key = %location.key(),
                    "Failed to abort S3 multipart upload"
                );
            }
            tracing::error!(
                error = %e,
                bucket = %location.bucket(),
                key = %location.key(),
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        tracing::info!(
            bucket = %location.bucket(),
            key = %location.key(),
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn presign_get(
        &self,
        location: &StorageLocation,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for(location.bucket())?;
        let path = ObjectPath::from(location.key());

        let url = store
            .signed_url(Method::GET, &path, expires_in)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %location.bucket(),
                    key = %location.key(),
                    "S3 presign failed"
                );
                StorageError::PresignFailed(e.to_string())
            })?;

        Ok(url.to_string())
    }

    /// Path-style for custom endpoints, virtual-hosted style for AWS.
    fn public_url(&self, location: &StorageLocation) -> String {
        if let Some(ref endpoint) = self.settings.endpoint_url {
            format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                location.bucket(),
                location.key()
            )
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                location.bucket(),
                self.settings.region,
                location.key()
            )
        }
    }

    async fn delete(&self, location: &StorageLocation) -> StorageResult<()> {
        let start = Instant::now();
        let store = self.store_for(location.bucket())?;

        store
            .delete(&ObjectPath::from(location.key()))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %location.bucket(),
                    key = %location.key(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %location.bucket(),
            key = %location.key(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
