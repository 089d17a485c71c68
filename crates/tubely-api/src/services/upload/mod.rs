//! Upload-and-derive pipeline
//!
//! validate → stage → (classify → remux) → store → persist → sign

mod pipeline;
mod staging;
mod types;

pub use pipeline::UploadPipeline;
pub use staging::{StagedUpload, StagingArea};
pub use types::{normalize_content_type, UploadKind, ValidatedContentType};
