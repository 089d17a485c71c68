//! Constants shared across crates.

/// Multipart field carrying a thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying a video file.
pub const VIDEO_FIELD: &str = "video";

/// Content types accepted for thumbnails.
pub const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Content types accepted for videos.
pub const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

/// Issuer claim expected on access tokens.
pub const JWT_ISSUER: &str = "tubely-access";

/// Separator of the persisted `bucket,key` location form.
pub const LOCATION_SEPARATOR: char = ',';

/// Number of random bytes behind every generated object key.
pub const KEY_TOKEN_BYTES: usize = 32;

/// Prefix of per-request staging directories.
pub const STAGING_DIR_PREFIX: &str = "tubely-upload-";

pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 150;
pub const DEFAULT_MAX_VIDEO_SIZE_MB: u64 = 1024;
pub const DEFAULT_MAX_THUMBNAIL_SIZE_MB: u64 = 10;
