pub mod aspect;
pub mod location;
pub mod video;

pub use aspect::AspectRatio;
pub use location::{LocationParseError, StorageLocation};
pub use video::{CreateVideoParams, Video, VideoResponse};
