//! Service wiring: repository, staging area and ingest pipeline.

use crate::services::{IngestOptions, IngestPipeline, StagingArea};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vod_core::Config;
use vod_db::{DocumentStore, VideoRepository};
use vod_storage::Storage;

pub async fn initialize_services(
    config: &Config,
    document_store: Arc<dyn DocumentStore>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let videos = VideoRepository::new(document_store, config.videos_collection());

    let staging = StagingArea::create(config.staging_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir().display()
            )
        })?;

    let options = IngestOptions::from_config(config);
    tracing::info!(
        staging_dir = %staging.dir().display(),
        collection = %videos.collection(),
        max_video_mb = options.max_video_size_bytes / 1024 / 1024,
        max_thumbnail_mb = options.max_thumbnail_size_bytes / 1024 / 1024,
        timeout_secs = options.timeout.as_secs(),
        compensate_orphans = options.compensate_orphans,
        "Ingest pipeline initialized"
    );

    let ingest = IngestPipeline::new(storage.clone(), videos.clone(), staging, options);

    Ok(Arc::new(AppState {
        ingest,
        videos,
        storage,
    }))
}
