//! Application state shared by all handlers.

use crate::services::IngestPipeline;
use std::sync::Arc;
use vod_db::VideoRepository;
use vod_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub ingest: IngestPipeline,
    pub videos: VideoRepository,
    pub storage: Arc<dyn Storage>,
}
