pub mod health;
mod multipart;
pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use tubely_core::AppError;
use uuid::Uuid;

/// Parse the `{videoID}` path segment; anything but a UUID is a 400.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Ok(Uuid::parse_str(raw.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_video_id("not-a-uuid"),
            Err(AppError::BadRequest(_))
        ));
    }
}
