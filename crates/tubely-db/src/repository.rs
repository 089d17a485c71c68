use async_trait::async_trait;
use tubely_core::{AppError, CreateVideoParams, Video};
use uuid::Uuid;

/// Persistence for video records.
///
/// Updates are last-write-wins: no version token is compared, so concurrent
/// updates to the same record silently overwrite each other.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, params: CreateVideoParams) -> Result<Video, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist every mutable field of `video` and refresh `updated_at`.
    ///
    /// Returns `NotFound` if the record does not exist.
    async fn update(&self, video: &Video) -> Result<Video, AppError>;

    /// Videos owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
