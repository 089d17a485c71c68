use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use tubely_core::VideoResponse;

use super::multipart::{field_body, is_file_field, missing_field};
use super::parse_video_id;
use crate::auth::CallerIdentity;
use crate::error::{multipart_error, ErrorResponse, HttpAppError};
use crate::services::upload::UploadKind;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video ID (UUID)")),
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Form with a `thumbnail` file field (image/jpeg or image/png)"),
    responses(
        (status = 200, description = "Thumbnail attached", body = VideoResponse),
        (status = 400, description = "Malformed video ID or form", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 415, description = "Unsupported content type", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = state.pipeline.load_owned(caller.user_id, video_id).await?;

    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !is_file_field(&field, UploadKind::Thumbnail) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let response = state
            .pipeline
            .upload_thumbnail(video, content_type.as_deref(), field_body(field))
            .await?;

        tracing::info!(video_id = %video_id, user_id = %caller.user_id, "Thumbnail uploaded");
        return Ok(Json(response));
    }

    Err(missing_field(UploadKind::Thumbnail).into())
}
