use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::location::StorageLocation;

/// Caller-supplied fields of a new video. Passed through untouched by the upload pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CreateVideoParams {
    pub title: String,
    pub description: String,
}

/// A persisted video record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    /// Stable reference to the uploaded video; never a signed URL.
    pub video_url: Option<StorageLocation>,
    pub title: String,
    pub description: String,
}

impl Video {
    pub fn new(user_id: Uuid, params: CreateVideoParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
            title: params.title,
            description: params.description,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Video record as returned to clients; `video_url` is a short-lived signed URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub title: String,
    pub description: String,
}

impl VideoResponse {
    pub fn from_video(video: Video, signed_video_url: Option<String>) -> Self {
        Self {
            id: video.id,
            user_id: video.user_id,
            created_at: video.created_at,
            updated_at: video.updated_at,
            thumbnail_url: video.thumbnail_url,
            video_url: signed_video_url,
            title: video.title,
            description: video.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_serializes_location_as_wire_string() {
        let mut video = Video::new(
            Uuid::new_v4(),
            CreateVideoParams {
                title: "Boots".into(),
                description: "A video about boots".into(),
            },
        );
        video.video_url = Some(StorageLocation::new("tubely", "portrait_abc.mp4").unwrap());

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["video_url"], "tubely,portrait_abc.mp4");
        assert_eq!(json["title"], "Boots");
        assert!(json["thumbnail_url"].is_null());
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let video = Video::new(owner, CreateVideoParams::default());
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));
    }
}
