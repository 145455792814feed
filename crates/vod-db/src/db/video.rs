//! Video repository: video records stored as documents in one collection.

use super::document::{Document, DocumentStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use vod_core::{AccessControlList, AppError, NewVideoRecord, VideoRecord};

fn document_to_record(document: Document) -> Result<VideoRecord, AppError> {
    let mut fields = document.fields;
    fields.insert("id".to_string(), JsonValue::String(document.id.clone()));
    serde_json::from_value(JsonValue::Object(fields)).map_err(|e| {
        AppError::PersistenceFailure(format!(
            "Document {} is not a valid video record: {}",
            document.id, e
        ))
    })
}

/// Typed access to the videos collection
#[derive(Clone)]
pub struct VideoRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl VideoRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Persist a new record with a store-assigned id.
    ///
    /// Returns the stored record and the permission strings it was written with.
    #[tracing::instrument(skip(self, new, acl), fields(db.collection = %self.collection))]
    pub async fn create(
        &self,
        new: NewVideoRecord,
        acl: &AccessControlList,
    ) -> Result<(VideoRecord, Vec<String>), AppError> {
        let fields = match serde_json::to_value(&new) {
            Ok(JsonValue::Object(map)) => map,
            Ok(_) => {
                return Err(AppError::Internal(
                    "Video record did not serialize to an object".to_string(),
                ))
            }
            Err(e) => {
                return Err(AppError::Internal(format!(
                    "Failed to serialize video record: {}",
                    e
                )))
            }
        };

        let start = std::time::Instant::now();
        let document = self
            .store
            .create_record(&self.collection, None, fields, acl.to_strings())
            .await?;

        tracing::info!(
            document_id = %document.id,
            backend = self.store.backend_name(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video record persisted"
        );

        let permissions = document.permissions.clone();
        Ok((new.into_record(document.id), permissions))
    }

    #[tracing::instrument(skip(self), fields(db.collection = %self.collection, db.record_id = %id))]
    pub async fn get(&self, id: &str) -> Result<Option<VideoRecord>, AppError> {
        self.store
            .get_record(&self.collection, id)
            .await?
            .map(document_to_record)
            .transpose()
    }

    /// Newest first. Documents that do not decode as video records are skipped.
    #[tracing::instrument(skip(self), fields(db.collection = %self.collection))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<VideoRecord>, AppError> {
        let documents = self
            .store
            .list_records(&self.collection, limit, offset)
            .await?;

        Ok(documents
            .into_iter()
            .filter_map(|doc| match document_to_record(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed video document");
                    None
                }
            })
            .collect())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}
