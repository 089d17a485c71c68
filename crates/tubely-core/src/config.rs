//! Configuration module
//!
//! `Config` is loaded once at startup from the environment (and an optional `.env`
//! file), validated, and then passed by reference to every constructor that needs it.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_THUMBNAIL_SIZE_MB, DEFAULT_MAX_VIDEO_SIZE_MB, DEFAULT_PRESIGN_TTL_SECS,
};
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_CONCURRENT_PROCESSES: usize = 2;
const PROCESS_TIMEOUT_SECS: u64 = 300;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const DEFAULT_LOCAL_BUCKET: &str = "tubely";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub log_format: String,
    // Authentication
    pub jwt_secret: String,
    // Metadata store
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Object store
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: PathBuf,
    pub local_storage_base_url: String,
    pub local_storage_bucket: String,
    pub presign_ttl_secs: u64,
    // Upload pipeline
    pub staging_dir: PathBuf,
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
    // External tools
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub max_concurrent_processes: usize,
    pub process_timeout_secs: u64,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `mb` mebibytes in bytes, rejecting values that overflow `u64`.
fn mib_to_bytes(name: &str, mb: u64) -> Result<u64, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MiB", name, mb))
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let max_video_size_bytes = mib_to_bytes(
            "MAX_VIDEO_SIZE_MB",
            env_or("MAX_VIDEO_SIZE_MB", DEFAULT_MAX_VIDEO_SIZE_MB),
        )?;
        let max_thumbnail_size_bytes = mib_to_bytes(
            "MAX_THUMBNAIL_SIZE_MB",
            env_or("MAX_THUMBNAIL_SIZE_MB", DEFAULT_MAX_THUMBNAIL_SIZE_MB),
        )?;

        Ok(Config {
            server_port,
            environment,
            cors_origins,
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            database_url: env_opt("DATABASE_URL"),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION")
                .or_else(|| env_opt("AWS_REGION"))
                .unwrap_or_else(|| "us-east-1".to_string()),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/assets", server_port)),
            local_storage_bucket: env_opt("LOCAL_STORAGE_BUCKET")
                .unwrap_or_else(|| DEFAULT_LOCAL_BUCKET.to_string()),
            presign_ttl_secs: env_or("PRESIGN_TTL_SECS", DEFAULT_PRESIGN_TTL_SECS),
            staging_dir: env_opt("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_video_size_bytes,
            max_thumbnail_size_bytes,
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            max_concurrent_processes: env_or("MAX_CONCURRENT_PROCESSES", MAX_CONCURRENT_PROCESSES),
            process_timeout_secs: env_or("PROCESS_TIMEOUT_SECS", PROCESS_TIMEOUT_SECS),
        })
    }

    /// Reject configurations that would fail at request time or leak details in production.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production. \
                Set specific allowed origins via CORS_ORIGINS."
            ));
        }

        if self.is_production() && self.database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be set in production; the in-memory store is for development only"
            ));
        }

        if let Some(ref url) = self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a PostgreSQL connection string"
                ));
            }
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }

        if self.db_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("DB_TIMEOUT_SECONDS cannot be 0"));
        }

        if self.storage_backend == StorageBackend::S3 && self.s3_bucket.is_none() {
            return Err(anyhow::anyhow!(
                "S3_BUCKET must be set when using the S3 storage backend"
            ));
        }

        if self.presign_ttl_secs == 0 {
            return Err(anyhow::anyhow!("PRESIGN_TTL_SECS cannot be 0"));
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits cannot be 0"));
        }

        if self.max_concurrent_processes == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_PROCESSES cannot be 0"));
        }

        if self.process_timeout_secs == 0 {
            return Err(anyhow::anyhow!("PROCESS_TIMEOUT_SECS cannot be 0"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }

    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }

    /// Bucket that new objects are written to.
    pub fn destination_bucket(&self) -> &str {
        match self.storage_backend {
            StorageBackend::S3 => self.s3_bucket.as_deref().unwrap_or_default(),
            StorageBackend::Local => &self.local_storage_bucket,
        }
    }
}
