//! Upload pipeline orchestration
//!
//! Thumbnail: validate → stage → store → sign → persist.
//! Video: validate → stage → classify → remux → store → sign → persist.
//!
//! Nothing is persisted until every earlier step has succeeded, and the staging
//! directory of an invocation is removed on every exit path.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::Stream;
use tubely_core::{AppError, Config, StorageLocation, Video, VideoResponse};
use tubely_db::VideoRepository;
use tubely_processing::{MediaInspector, Remuxer};
use tubely_storage::keys::{thumbnail_key, video_key};
use tubely_storage::Storage;
use uuid::Uuid;

use super::staging::{StagedUpload, StagingArea};
use super::types::{UploadKind, ValidatedContentType};

pub struct UploadPipeline {
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    inspector: Arc<dyn MediaInspector>,
    remuxer: Arc<dyn Remuxer>,
    staging: StagingArea,
    presign_ttl: Duration,
    max_video_bytes: u64,
    max_thumbnail_bytes: u64,
}

impl UploadPipeline {
    pub fn new(
        config: &Config,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        inspector: Arc<dyn MediaInspector>,
        remuxer: Arc<dyn Remuxer>,
    ) -> Self {
        Self {
            videos,
            storage,
            inspector,
            remuxer,
            staging: StagingArea::new(config.staging_dir.clone()),
            presign_ttl: config.presign_ttl(),
            max_video_bytes: config.max_video_size_bytes,
            max_thumbnail_bytes: config.max_thumbnail_size_bytes,
        }
    }

    /// Load a video the caller is allowed to mutate.
    ///
    /// Existence is checked before ownership: `NotFound`, then `Forbidden`.
    pub async fn load_owned(&self, user_id: Uuid, video_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(video_id = %video_id, user_id = %user_id, "Ownership check failed");
            return Err(AppError::Forbidden(
                "You are not the owner of this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// Attach a thumbnail to `video`. The stored URL is the plain object URL.
    #[tracing::instrument(skip(self, video, body), fields(video_id = %video.id))]
    pub async fn upload_thumbnail<S>(
        &self,
        video: Video,
        content_type: Option<&str>,
        body: S,
    ) -> Result<VideoResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Unpin + Send,
    {
        let content_type = UploadKind::Thumbnail.validate_content_type(content_type)?;
        let staged = self
            .staging
            .stage(
                body,
                &format!("thumbnail.{}", content_type.extension()),
                self.max_thumbnail_bytes,
            )
            .await?;

        let result = self.store_thumbnail(video, &staged, &content_type).await;
        staged.cleanup().await;
        result
    }

    /// Attach a video to `video`; the response carries a freshly signed URL.
    #[tracing::instrument(skip(self, video, body), fields(video_id = %video.id))]
    pub async fn upload_video<S>(
        &self,
        video: Video,
        content_type: Option<&str>,
        body: S,
    ) -> Result<VideoResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, AppError>> + Unpin + Send,
    {
        let content_type = UploadKind::Video.validate_content_type(content_type)?;
        let staged = self
            .staging
            .stage(
                body,
                &format!("video.{}", content_type.extension()),
                self.max_video_bytes,
            )
            .await?;

        let result = self.store_video(video, &staged, &content_type).await;
        staged.cleanup().await;
        result
    }

    /// Client view of `video` with a signed video URL minted now.
    pub async fn sign(&self, video: Video) -> Result<VideoResponse, AppError> {
        let signed = self.signed_video_url(&video).await?;
        Ok(VideoResponse::from_video(video, signed))
    }

    async fn signed_video_url(&self, video: &Video) -> Result<Option<String>, AppError> {
        match &video.video_url {
            Some(location) => Ok(Some(
                self.storage.presign_get(location, self.presign_ttl).await?,
            )),
            None => Ok(None),
        }
    }

    async fn store_thumbnail(
        &self,
        mut video: Video,
        staged: &StagedUpload,
        content_type: &ValidatedContentType,
    ) -> Result<VideoResponse, AppError> {
        let location = self.new_location(thumbnail_key(content_type.extension()))?;

        self.put(&location, staged.path(), content_type.as_str())
            .await?;

        video.thumbnail_url = Some(self.storage.public_url(&location));
        self.commit(video, &location).await
    }

    async fn store_video(
        &self,
        mut video: Video,
        staged: &StagedUpload,
        content_type: &ValidatedContentType,
    ) -> Result<VideoResponse, AppError> {
        let aspect = self.inspector.aspect_ratio(staged.path()).await?;
        tracing::debug!(aspect_ratio = aspect.as_str(), "Video classified");

        // Written next to the staged source, so cleanup covers it.
        let processed = self.remuxer.fast_start(staged.path()).await?;

        let location = self.new_location(video_key(aspect))?;
        self.put(&location, &processed, content_type.as_str()).await?;

        video.video_url = Some(location.clone());
        self.commit(video, &location).await
    }

    fn new_location(&self, key: String) -> Result<StorageLocation, AppError> {
        StorageLocation::new(self.storage.bucket(), key)
            .map_err(|e| AppError::Internal(format!("Invalid storage location: {}", e)))
    }

    async fn put(
        &self,
        location: &StorageLocation,
        path: &Path,
        content_type: &str,
    ) -> Result<(), AppError> {
        let start = Instant::now();
        self.storage.put_file(location, path, content_type).await?;
        tracing::info!(
            bucket = location.bucket(),
            key = location.key(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Uploaded to storage"
        );
        Ok(())
    }

    /// Sign and persist `video` after `uploaded` was stored.
    ///
    /// The signed URL is minted before the update so a failure leaves the record
    /// untouched. On any failure the object at `uploaded` is deleted in the background.
    async fn commit(
        &self,
        video: Video,
        uploaded: &StorageLocation,
    ) -> Result<VideoResponse, AppError> {
        let result = async {
            let signed = self.signed_video_url(&video).await?;
            let updated = self.videos.update(&video).await?;
            Ok::<_, AppError>(VideoResponse::from_video(updated, signed))
        }
        .await;

        if let Err(e) = &result {
            tracing::error!(
                error = %e,
                video_id = %video.id,
                "Upload could not be committed, discarding uploaded object"
            );
            self.discard(uploaded.clone());
        }
        result
    }

    fn discard(&self, location: StorageLocation) {
        let storage = self.storage.clone();
        tokio::spawn(async move {
            match storage.delete(&location).await {
                Ok(()) => tracing::info!(
                    bucket = location.bucket(),
                    key = location.key(),
                    "Orphaned object deleted"
                ),
                Err(e) => tracing::warn!(
                    error = %e,
                    bucket = location.bucket(),
                    key = location.key(),
                    "Failed to delete orphaned object"
                ),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream;
    use tempfile::TempDir;
    use tubely_core::{AspectRatio, CreateVideoParams};
    use tubely_db::InMemoryVideoRepository;
    use tubely_processing::{faststart_output_path, ProcessingError, StreamDimensions};
    use tubely_storage::{StorageBackend, StorageError, StorageResult};

    const BUCKET: &str = "tubely-test";

    #[derive(Default)]
    struct RecordingStorage {
        puts: Mutex<Vec<(StorageLocation, Vec<u8>, String)>>,
        deletes: Mutex<Vec<StorageLocation>>,
        presign_fails: AtomicBool,
    }

    #[async_trait]
    impl Storage for RecordingStorage {
        fn bucket(&self) -> &str {
            BUCKET
        }

        async fn put_file(
            &self,
            location: &StorageLocation,
            path: &Path,
            content_type: &str,
        ) -> StorageResult<()> {
            let data = tokio::fs::read(path).await?;
            self.puts
                .lock()
                .unwrap()
                .push((location.clone(), data, content_type.to_string()));
            Ok(())
        }

        async fn presign_get(
            &self,
            location: &StorageLocation,
            expires_in: Duration,
        ) -> StorageResult<String> {
            if self.presign_fails.load(Ordering::SeqCst) {
                return Err(StorageError::PresignFailed("expired credentials".to_string()));
            }
            Ok(format!(
                "https://signed.example/{}/{}?ttl={}",
                location.bucket(),
                location.key(),
                expires_in.as_secs()
            ))
        }

        fn public_url(&self, location: &StorageLocation) -> String {
            format!("https://public.example/{}/{}", location.bucket(), location.key())
        }

        async fn delete(&self, location: &StorageLocation) -> StorageResult<()> {
            self.deletes.lock().unwrap().push(location.clone());
            Ok(())
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Local
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl Storage for FailingStorage {
        fn bucket(&self) -> &str {
            BUCKET
        }

        async fn put_file(&self, _: &StorageLocation, _: &Path, _: &str) -> StorageResult<()> {
            Err(StorageError::UploadFailed("AccessDenied".to_string()))
        }

        async fn presign_get(&self, _: &StorageLocation, _: Duration) -> StorageResult<String> {
            Err(StorageError::PresignFailed("no credentials".to_string()))
        }

        fn public_url(&self, location: &StorageLocation) -> String {
            location.to_string()
        }

        async fn delete(&self, _: &StorageLocation) -> StorageResult<()> {
            Ok(())
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::S3
        }
    }

    struct FixedInspector {
        dimensions: StreamDimensions,
        calls: AtomicUsize,
    }

    impl FixedInspector {
        fn new(width: i64, height: i64) -> Self {
            Self {
                dimensions: StreamDimensions { width, height },
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaInspector for FixedInspector {
        async fn aspect_ratio(&self, path: &Path) -> Result<AspectRatio, ProcessingError> {
            assert!(path.exists(), "inspector must see the staged file");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.dimensions.aspect_ratio()
        }
    }

    #[derive(Default)]
    struct CopyRemuxer {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Remuxer for CopyRemuxer {
        async fn fast_start(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProcessingError::Failed {
                    tool: "ffmpeg".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "moov atom not found".to_string(),
                });
            }
            let output = faststart_output_path(input);
            let mut data = tokio::fs::read(input).await.unwrap();
            data.extend_from_slice(b"+faststart");
            tokio::fs::write(&output, data).await.unwrap();
            Ok(output)
        }
    }

    /// Repository whose updates always fail.
    struct BrokenUpdates(InMemoryVideoRepository);

    #[async_trait]
    impl VideoRepository for BrokenUpdates {
        async fn create(
            &self,
            user_id: Uuid,
            params: CreateVideoParams,
        ) -> Result<Video, AppError> {
            self.0.create(user_id, params).await
        }

        async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
            self.0.get(id).await
        }

        async fn update(&self, _video: &Video) -> Result<Video, AppError> {
            Err(AppError::Internal("connection reset".to_string()))
        }

        async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
            self.0.list_by_user(user_id).await
        }

        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    struct Harness {
        staging_root: TempDir,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<RecordingStorage>,
        inspector: Arc<FixedInspector>,
        remuxer: Arc<CopyRemuxer>,
        pipeline: UploadPipeline,
    }

    fn test_config(staging_dir: &Path) -> Config {
        Config {
            server_port: 8091,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            http_concurrency_limit: 16,
            log_format: "compact".to_string(),
            jwt_secret: "secret".to_string(),
            database_url: None,
            db_max_connections: 1,
            db_timeout_seconds: 1,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            local_storage_path: staging_dir.join("assets"),
            local_storage_base_url: "http://localhost:8091/assets".to_string(),
            local_storage_bucket: BUCKET.to_string(),
            presign_ttl_secs: 150,
            staging_dir: staging_dir.to_path_buf(),
            max_video_size_bytes: 1024,
            max_thumbnail_size_bytes: 64,
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            max_concurrent_processes: 1,
            process_timeout_secs: 5,
        }
    }

    fn harness_with(
        videos: Arc<dyn VideoRepository>,
        inspector: FixedInspector,
        remuxer: CopyRemuxer,
    ) -> Harness {
        let staging_root = tempfile::tempdir().unwrap();
        let storage = Arc::new(RecordingStorage::default());
        let inspector = Arc::new(inspector);
        let remuxer = Arc::new(remuxer);
        let pipeline = UploadPipeline::new(
            &test_config(staging_root.path()),
            videos.clone(),
            storage.clone(),
            inspector.clone(),
            remuxer.clone(),
        );
        Harness {
            staging_root,
            videos,
            storage,
            inspector,
            remuxer,
            pipeline,
        }
    }

    fn harness(width: i64, height: i64) -> Harness {
        harness_with(
            Arc::new(InMemoryVideoRepository::new()),
            FixedInspector::new(width, height),
            CopyRemuxer::default(),
        )
    }

    fn body(data: &'static [u8]) -> impl Stream<Item = Result<Bytes, AppError>> + Unpin + Send {
        stream::iter(vec![Ok(Bytes::from_static(data))])
    }

    fn staging_entries(h: &Harness) -> usize {
        std::fs::read_dir(h.staging_root.path()).unwrap().count()
    }

    async fn wait_for_deletes(h: &Harness) -> Vec<StorageLocation> {
        for _ in 0..100 {
            if !h.storage.deletes.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        h.storage.deletes.lock().unwrap().clone()
    }

    async fn owned_video(h: &Harness) -> Video {
        h.videos
            .create(Uuid::new_v4(), CreateVideoParams::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_owned() {
        let h = harness(1920, 1080);
        let video = owned_video(&h).await;

        let loaded = h.pipeline.load_owned(video.user_id, video.id).await.unwrap();
        assert_eq!(loaded.id, video.id);

        assert!(matches!(
            h.pipeline.load_owned(Uuid::new_v4(), video.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            h.pipeline.load_owned(video.user_id, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_gif_thumbnail_rejected_before_staging() {
        let h = harness(1920, 1080);
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_thumbnail(video.clone(), Some("image/gif"), body(b"GIF89a"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        assert_eq!(staging_entries(&h), 0);
        assert!(h.storage.puts.lock().unwrap().is_empty());
        assert_eq!(h.videos.get(video.id).await.unwrap().unwrap(), video);
    }

    #[tokio::test]
    async fn test_unsupported_video_type_never_reaches_tools() {
        let h = harness(1920, 1080);
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_video(video, Some("video/webm"), body(b"webm"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        assert_eq!(h.inspector.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.remuxer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_thumbnail_upload() {
        let h = harness(1920, 1080);
        let video = owned_video(&h).await;

        let response = h
            .pipeline
            .upload_thumbnail(video.clone(), Some("image/png"), body(b"\x89PNG"))
            .await
            .unwrap();

        let puts = h.storage.puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        let (location, data, content_type) = &puts[0];
        assert_eq!(location.bucket(), BUCKET);
        assert!(location.key().ends_with(".png"));
        assert_eq!(data, b"\x89PNG");
        assert_eq!(content_type, "image/png");

        let expected_url = format!("https://public.example/{}/{}", BUCKET, location.key());
        assert_eq!(response.thumbnail_url.as_deref(), Some(expected_url.as_str()));

        let stored = h.videos.get(video.id).await.unwrap().unwrap();
        assert_eq!(stored.thumbnail_url.as_deref(), Some(expected_url.as_str()));
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_oversized_thumbnail() {
        let h = harness(1920, 1080);
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_thumbnail(video, Some("image/jpeg"), body(&[0u8; 65]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(h.storage.puts.lock().unwrap().is_empty());
        assert_eq!(staging_entries(&h), 0);
    }

    async fn upload_and_get_key(width: i64, height: i64) -> String {
        let h = harness(width, height);
        let video = owned_video(&h).await;

        let response = h
            .pipeline
            .upload_video(video.clone(), Some("video/mp4"), body(b"mp4 data"))
            .await
            .unwrap();

        let stored = h.videos.get(video.id).await.unwrap().unwrap();
        let location = stored.video_url.expect("video location persisted");

        // Persisted form is the bare pair, the response carries the signed URL.
        let wire = location.to_string();
        let parts: Vec<&str> = wire.split(',').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| !p.is_empty()));
        assert_eq!(parts[0], BUCKET);

        let signed = response.video_url.expect("signed URL in response");
        assert!(signed.starts_with("https://signed.example/"));
        assert!(signed.contains(location.key()));
        assert!(signed.ends_with("ttl=150"));

        let puts = h.storage.puts.lock().unwrap().clone();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].1, b"mp4 data+faststart");
        assert_eq!(puts[0].2, "video/mp4");

        assert_eq!(h.inspector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.remuxer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(staging_entries(&h), 0);

        location.key().to_string()
    }

    #[tokio::test]
    async fn test_video_key_prefixes() {
        let key = upload_and_get_key(1920, 1080).await;
        assert!(key.starts_with("landscape_") && key.ends_with(".mp4"));

        let key = upload_and_get_key(1080, 1920).await;
        assert!(key.starts_with("portrait_"));

        let key = upload_and_get_key(1000, 100).await;
        assert!(key.starts_with("other_"));
    }

    #[tokio::test]
    async fn test_remux_failure_aborts_before_upload() {
        let h = harness_with(
            Arc::new(InMemoryVideoRepository::new()),
            FixedInspector::new(1920, 1080),
            CopyRemuxer {
                fail: true,
                ..Default::default()
            },
        );
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_video(video.clone(), Some("video/mp4"), body(b"broken"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Processing(_)));
        assert!(h.storage.puts.lock().unwrap().is_empty());
        assert_eq!(h.videos.get(video.id).await.unwrap().unwrap(), video);
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_unclassifiable_video_is_processing_error() {
        let h = harness(1920, 0);
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_video(video, Some("video/mp4"), body(b"audio only"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Processing(_)));
        assert_eq!(h.remuxer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_record_untouched() {
        let staging_root = tempfile::tempdir().unwrap();
        let videos: Arc<dyn VideoRepository> = Arc::new(InMemoryVideoRepository::new());
        let pipeline = UploadPipeline::new(
            &test_config(staging_root.path()),
            videos.clone(),
            Arc::new(FailingStorage),
            Arc::new(FixedInspector::new(1920, 1080)),
            Arc::new(CopyRemuxer::default()),
        );
        let video = videos
            .create(Uuid::new_v4(), CreateVideoParams::default())
            .await
            .unwrap();

        let err = pipeline
            .upload_video(video.clone(), Some("video/mp4"), body(b"mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(videos.get(video.id).await.unwrap().unwrap(), video);
        assert_eq!(std::fs::read_dir(staging_root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_deletes_uploaded_object() {
        let h = harness_with(
            Arc::new(BrokenUpdates(InMemoryVideoRepository::new())),
            FixedInspector::new(1920, 1080),
            CopyRemuxer::default(),
        );
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_video(video, Some("video/mp4"), body(b"mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        let uploaded = h.storage.puts.lock().unwrap()[0].0.clone();
        assert_eq!(wait_for_deletes(&h).await, vec![uploaded]);
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_presign_failure_discards_video() {
        let h = harness(1080, 1920);
        h.storage.presign_fails.store(true, Ordering::SeqCst);
        let video = owned_video(&h).await;

        let err = h
            .pipeline
            .upload_video(video.clone(), Some("video/mp4"), body(b"mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(h.videos.get(video.id).await.unwrap().unwrap(), video);

        let uploaded = h.storage.puts.lock().unwrap()[0].0.clone();
        assert!(uploaded.key().starts_with("portrait_"));
        assert_eq!(wait_for_deletes(&h).await, vec![uploaded]);
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_thumbnail_presign_failure_leaves_record_untouched() {
        let h = harness(1920, 1080);
        let mut video = owned_video(&h).await;
        video.video_url = Some(StorageLocation::new(BUCKET, "landscape_existing.mp4").unwrap());
        let video = h.videos.update(&video).await.unwrap();
        h.storage.presign_fails.store(true, Ordering::SeqCst);

        let err = h
            .pipeline
            .upload_thumbnail(video.clone(), Some("image/png"), body(b"\x89PNG"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        let stored = h.videos.get(video.id).await.unwrap().unwrap();
        assert_eq!(stored, video);
        assert!(stored.thumbnail_url.is_none());

        let uploaded = h.storage.puts.lock().unwrap()[0].0.clone();
        assert!(uploaded.key().ends_with(".png"));
        assert_eq!(wait_for_deletes(&h).await, vec![uploaded]);
        assert_eq!(staging_entries(&h), 0);
    }

    #[tokio::test]
    async fn test_sign_without_video() {
        let h = harness(1920, 1080);
        let video = owned_video(&h).await;

        let response = h.pipeline.sign(video).await.unwrap();
        assert!(response.video_url.is_none());
    }
}
