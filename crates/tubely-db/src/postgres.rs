//! Video repository: CRUD for the videos table.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, CreateVideoParams, StorageLocation, Video};
use uuid::Uuid;

use crate::repository::VideoRepository;

const VIDEO_COLUMNS: &str =
    "id, created_at, updated_at, thumbnail_url, video_url, title, description, user_id";

/// Row type for videos table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

impl VideoRow {
    pub fn into_video(self) -> Result<Video, AppError> {
        let video_url = self
            .video_url
            .map(|raw| {
                raw.parse::<StorageLocation>()
                    .with_context(|| format!("video {} has malformed video_url {:?}", self.id, raw))
            })
            .transpose()?;

        Ok(Video {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            thumbnail_url: self.thumbnail_url,
            video_url,
            title: self.title,
            description: self.description,
        })
    }
}

/// PostgreSQL-backed [`VideoRepository`].
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self, params), fields(db.table = "videos"))]
    async fn create(&self, user_id: Uuid, params: CreateVideoParams) -> Result<Video, AppError> {
        let video = Video::new(user_id, params);
        let row: VideoRow = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            INSERT INTO videos (id, created_at, updated_at, title, description, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(video.id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.user_id)
        .fetch_one(&self.pool)
        .await?;
        row.into_video()
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(VideoRow::into_video).transpose()
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.record_id = %video.id))]
    async fn update(&self, video: &Video) -> Result<Video, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, video_url = $3, title = $4, description = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(video.id)
        .bind(&video.thumbnail_url)
        .bind(video.video_url.as_ref().map(|l| l.to_string()))
        .bind(&video.title)
        .bind(&video.description)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_video(),
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
            VIDEO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(VideoRow::into_video).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
