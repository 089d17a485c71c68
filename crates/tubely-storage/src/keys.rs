//! Object key generation shared by every upload path.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use tubely_core::constants::KEY_TOKEN_BYTES;
use tubely_core::AspectRatio;

/// Fresh random token: 32 random bytes, URL-safe base64 without padding.
pub fn random_token() -> String {
    let mut bytes = [0u8; KEY_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Key for a thumbnail; `extension` comes from the validated content type.
pub fn thumbnail_key(extension: &str) -> String {
    format!("{}.{}", random_token(), extension)
}

/// Key for a fast-start MP4 of the given aspect-ratio bucket.
pub fn video_key(aspect: AspectRatio) -> String {
    format!("{}{}.mp4", aspect.key_prefix(), random_token())
}
