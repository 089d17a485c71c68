//! Application state shared by every handler.

use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_storage::Storage;

use crate::services::upload::UploadPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub pipeline: Arc<UploadPipeline>,
}
