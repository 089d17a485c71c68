use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tubely_core::VideoResponse;

use super::parse_video_id;
use crate::auth::CallerIdentity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Fetch one of the caller's videos with a freshly signed `video_url`.
#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video ID (UUID)")),
    responses(
        (status = 200, description = "Video record", body = VideoResponse),
        (status = 400, description = "Malformed video ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state.pipeline.load_owned(caller.user_id, video_id).await?;
    Ok(Json(state.pipeline.sign(video).await?))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = [VideoResponse]),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_by_user(caller.user_id).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(state.pipeline.sign(video).await?);
    }

    Ok(Json(responses))
}
