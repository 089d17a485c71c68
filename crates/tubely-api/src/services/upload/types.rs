//! Upload kinds and content-type validation

use tubely_core::constants::{
    THUMBNAIL_CONTENT_TYPES, THUMBNAIL_FIELD, VIDEO_CONTENT_TYPES, VIDEO_FIELD,
};
use tubely_core::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Thumbnail,
    Video,
}

impl UploadKind {
    /// Multipart field the file is read from.
    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::Thumbnail => THUMBNAIL_FIELD,
            UploadKind::Video => VIDEO_FIELD,
        }
    }

    pub fn allowed_content_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Thumbnail => THUMBNAIL_CONTENT_TYPES,
            UploadKind::Video => VIDEO_CONTENT_TYPES,
        }
    }

    /// Check the declared content type against the allow-list.
    ///
    /// A missing or unparsable value is a malformed request (400); a well-formed type
    /// outside the allow-list is 415.
    pub fn validate_content_type(
        self,
        declared: Option<&str>,
    ) -> Result<ValidatedContentType, AppError> {
        let raw = declared.ok_or_else(|| {
            AppError::BadRequest(format!("Missing content type for {}", self.field_name()))
        })?;

        let essence = normalize_content_type(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid content type: {}", raw)))?;

        if !self.allowed_content_types().contains(&essence.as_str()) {
            return Err(AppError::UnsupportedMediaType(format!(
                "Content type {} is not allowed for {} uploads. Allowed: {}",
                essence,
                self.field_name(),
                self.allowed_content_types().join(", ")
            )));
        }

        Ok(ValidatedContentType { essence })
    }
}

/// Lowercased `type/subtype` without parameters, or `None` if `raw` is not a media type.
pub fn normalize_content_type(raw: &str) -> Option<String> {
    let essence = raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.split_once('/') {
        Some((kind, subtype))
            if !kind.is_empty() && !subtype.is_empty() && !subtype.contains('/') =>
        {
            Some(essence)
        }
        _ => None,
    }
}

/// A content type that passed the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedContentType {
    essence: String,
}

impl ValidatedContentType {
    pub fn as_str(&self) -> &str {
        &self.essence
    }

    /// File extension for object keys: the media subtype (`jpeg`, `png`, `mp4`).
    pub fn extension(&self) -> &str {
        self.essence
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or("bin")
    }
}
