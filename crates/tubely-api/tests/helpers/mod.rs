//! Test helpers: build the application for integration tests.
//!
//! Every test gets its own in-memory metadata store, local storage and staging
//! directory. ffprobe and ffmpeg are replaced by shell scripts (see `tools`).

#![allow(dead_code)]

pub mod tools;

use std::sync::Arc;
use std::time::Duration;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;
use tubely_api::auth::issue_token;
use tubely_api::constants;
use tubely_api::setup::initialize_app;
use tubely_api::state::AppState;
use tubely_core::{Config, CreateVideoParams, StorageBackend, Video};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_BUCKET: &str = "tubely";

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state and owned temp directories.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub assets_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Create a video owned by `user_id` directly in the metadata store.
    pub async fn create_video(&self, user_id: Uuid) -> Video {
        self.state
            .videos
            .create(
                user_id,
                CreateVideoParams {
                    title: "Boot.dev beats".to_string(),
                    description: "A test video".to_string(),
                },
            )
            .await
            .expect("Failed to create video")
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.state
            .videos
            .get(id)
            .await
            .expect("Failed to load video")
            .expect("Video missing")
    }

    pub fn staging_entries(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub struct TestAppOptions {
    pub ffprobe: tools::Probe,
    pub ffmpeg_fails: bool,
    pub max_thumbnail_size_bytes: u64,
    pub max_video_size_bytes: u64,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            ffprobe: tools::Probe::Landscape,
            ffmpeg_fails: false,
            max_thumbnail_size_bytes: 1024,
            max_video_size_bytes: 64 * 1024,
        }
    }
}

pub fn test_config(assets_dir: &TempDir, staging_dir: &TempDir, options: &TestAppOptions) -> Config {
    Config {
        server_port: 8091,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        http_concurrency_limit: 64,
        log_format: "compact".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        database_url: None,
        db_max_connections: 1,
        db_timeout_seconds: 5,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        local_storage_path: assets_dir.path().to_path_buf(),
        local_storage_base_url: "http://localhost:8091/assets".to_string(),
        local_storage_bucket: TEST_BUCKET.to_string(),
        presign_ttl_secs: 150,
        staging_dir: staging_dir.path().to_path_buf(),
        max_video_size_bytes: options.max_video_size_bytes,
        max_thumbnail_size_bytes: options.max_thumbnail_size_bytes,
        ffprobe_path: tools::ffprobe(options.ffprobe),
        ffmpeg_path: tools::ffmpeg(options.ffmpeg_fails),
        max_concurrent_processes: 2,
        process_timeout_secs: 10,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create assets dir");
    let staging_dir = tempfile::tempdir().expect("Failed to create staging dir");
    let config = test_config(&assets_dir, &staging_dir, &options);

    let (state, router) = initialize_app(config)
        .await
        .expect("Failed to initialize app");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        assets_dir,
        staging_dir,
    }
}

pub fn bearer(user_id: Uuid) -> String {
    let token = issue_token(TEST_JWT_SECRET, user_id, Duration::from_secs(300))
        .expect("Failed to sign token");
    format!("Bearer {}", token)
}

pub fn file_form(field: &str, file_name: &str, mime_type: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}
