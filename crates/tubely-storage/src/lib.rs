//! Tubely Storage Library
//!
//! Object store gateway for uploaded assets. Objects are addressed by a
//! [`StorageLocation`](tubely_core::StorageLocation) (bucket + key); the backend decides
//! how a bucket maps to physical storage.
//!
//! # Key format
//!
//! Keys are a random 32-byte token, URL-safe base64 encoded without padding, plus an
//! extension. Video keys additionally carry an aspect-ratio prefix:
//!
//! - thumbnails: `{token}.{jpeg|png}`
//! - videos: `{landscape_|portrait_|other_}{token}.mp4`
//!
//! Key generation lives in the `keys` module so every caller produces the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
