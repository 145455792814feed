//! The upload ingestion pipeline.
//!
//! parse -> validate -> store video -> store thumbnail -> persist record.
//! Stages run strictly in order, none is retried, and the first failure is
//! returned as-is. Staged files are owned by the run and removed on every exit
//! path, including timeout.

use super::form::read_upload_form;
use super::staging::StagingArea;
use super::types::{IngestOptions, IngestOutcome};
use super::validate::{validate_upload, PreparedAsset, ValidatedUpload};
use axum::extract::Multipart;
use chrono::Utc;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;
use vod_core::{AccessControlList, AppError, NewVideoRecord, StoredAsset, Visibility};
use vod_db::VideoRepository;
use vod_storage::Storage;

#[derive(Clone)]
pub struct IngestPipeline {
    storage: Arc<dyn Storage>,
    videos: VideoRepository,
    staging: StagingArea,
    options: IngestOptions,
}

impl IngestPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        videos: VideoRepository,
        staging: StagingArea,
        options: IngestOptions,
    ) -> Self {
        Self {
            storage,
            videos,
            staging,
            options,
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Run one upload end to end, bounded by the configured timeout.
    #[tracing::instrument(skip(self, multipart))]
    pub async fn ingest(&self, mut multipart: Multipart) -> Result<IngestOutcome, AppError> {
        let start = Instant::now();
        let timeout = self.options.timeout;

        let result = match tokio::time::timeout(timeout, self.run(&mut multipart)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(timeout.as_secs())),
        };

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(outcome) => tracing::info!(
                video_id = %outcome.record.id,
                video_url = %outcome.video_url,
                duration_ms = %duration_ms,
                "Video upload ingested"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                error_type = e.error_type(),
                duration_ms = %duration_ms,
                "Video upload failed"
            ),
        }

        result
    }

    async fn run(&self, multipart: &mut Multipart) -> Result<IngestOutcome, AppError> {
        let form = read_upload_form(multipart, &self.staging, &self.options).await?;
        let ValidatedUpload {
            metadata,
            team_id,
            video,
            thumbnail,
        } = validate_upload(form, &self.options)?;

        let video_asset = self.store_asset(&video).await?;

        let thumbnail_asset = match self.store_asset(&thumbnail).await {
            Ok(asset) => asset,
            Err(e) => {
                self.compensate(&[&video_asset]).await;
                return Err(e);
            }
        };

        let acl = AccessControlList::for_upload(team_id.as_deref());
        let new_record = NewVideoRecord {
            title: metadata.title,
            description: metadata.description,
            duration_seconds: metadata.duration_seconds,
            is_premium: metadata.is_premium,
            genre: metadata.genre,
            tags: metadata.tags,
            video_url: video_asset.url.clone(),
            thumbnail_url: thumbnail_asset.url.clone(),
            views_count: 0,
            upload_timestamp: Utc::now(),
        };

        let (record, permissions) = match self.videos.create(new_record, &acl).await {
            Ok(created) => created,
            Err(e) => {
                self.compensate(&[&video_asset, &thumbnail_asset]).await;
                return Err(as_persistence_failure(e));
            }
        };

        video.staged.release();
        thumbnail.staged.release();

        Ok(IngestOutcome {
            record,
            video_url: video_asset.url,
            thumbnail_url: thumbnail_asset.url,
            permissions,
        })
    }

    async fn store_asset(&self, asset: &PreparedAsset) -> Result<StoredAsset, AppError> {
        let kind = asset.staged.kind();
        let start = Instant::now();

        let file = asset.staged.open().await.map_err(|e| {
            AppError::storage_failure(kind, format!("Failed to open staged file: {}", e))
        })?;
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(file);

        let stored = self
            .storage
            .upload_stream(
                &asset.file_name,
                &asset.content_type,
                Some(asset.staged.size()),
                reader,
                Visibility::Public,
            )
            .await
            .map_err(|e| AppError::storage_failure(kind, e.to_string()))?;

        tracing::debug!(
            kind = %kind,
            storage_key = %stored.id,
            size_bytes = asset.staged.size(),
            duration_ms = %(start.elapsed().as_secs_f64() * 1000.0),
            "Stored upload asset"
        );

        Ok(stored)
    }

    /// Best-effort removal of assets stored before a later stage failed.
    async fn compensate(&self, assets: &[&StoredAsset]) {
        for asset in assets {
            if !self.options.compensate_orphans {
                tracing::warn!(
                    storage_key = %asset.id,
                    url = %asset.url,
                    "Stored asset left orphaned after failed upload"
                );
                continue;
            }

            if let Err(e) = self.storage.delete(&asset.id).await {
                tracing::warn!(
                    error = %e,
                    storage_key = %asset.id,
                    "Failed to delete orphaned asset"
                );
            }
        }
    }
}

fn as_persistence_failure(error: AppError) -> AppError {
    match error {
        AppError::PersistenceFailure(_) => error,
        other => AppError::PersistenceFailure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_errors_keep_their_kind() {
        let err = as_persistence_failure(AppError::Internal("serialize".to_string()));
        assert!(matches!(err, AppError::PersistenceFailure(ref m) if m.contains("serialize")));

        let err = as_persistence_failure(AppError::PersistenceFailure("down".to_string()));
        assert!(matches!(err, AppError::PersistenceFailure(ref m) if m == "down"));
    }
}
