//! Process-local document store for development and tests.

use super::{generate_document_id, Document, DocumentStore};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use vod_core::AppError;

/// Documents are kept per collection in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_record(
        &self,
        collection: &str,
        id: Option<String>,
        fields: Map<String, JsonValue>,
        permissions: Vec<String>,
    ) -> Result<Document, AppError> {
        let id = id.unwrap_or_else(generate_document_id);
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.iter().any(|d| d.id == id) {
            return Err(AppError::PersistenceFailure(format!(
                "Document {} already exists in {}",
                id, collection
            )));
        }

        let document = Document {
            id,
            collection: collection.to_string(),
            fields,
            permissions,
            created_at: Utc::now(),
        };
        documents.push(document.clone());

        tracing::debug!(
            collection = %collection,
            document_id = %document.id,
            "Document created in memory store"
        );

        Ok(document)
    }

    async fn get_record(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn list_records(
        &self,
        collection: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
