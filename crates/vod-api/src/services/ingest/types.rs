use serde::Serialize;
use std::time::Duration;
use utoipa::ToSchema;
use vod_core::{Config, VideoRecord};

/// Limits and policy applied to every ingest run
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
    pub thumbnail_allowed_content_types: Vec<String>,
    pub timeout: Duration,
    pub compensate_orphans: bool,
}

impl IngestOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_video_size_bytes: config.max_video_size_bytes(),
            max_thumbnail_size_bytes: config.max_thumbnail_size_bytes(),
            video_allowed_content_types: config.video_allowed_content_types().to_vec(),
            thumbnail_allowed_content_types: config.thumbnail_allowed_content_types().to_vec(),
            timeout: config.ingest_timeout(),
            compensate_orphans: config.compensate_orphans(),
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    pub record: VideoRecord,
    pub video_url: String,
    pub thumbnail_url: String,
    /// Permission strings the record was written with, e.g. `read("any")`
    pub permissions: Vec<String>,
}
