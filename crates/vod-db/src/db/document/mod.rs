//! Collection-oriented document store.

mod memory;
mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use vod_core::AppError;

/// A stored document: free-form JSON fields plus an ACL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub collection: String,
    pub fields: Map<String, JsonValue>,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fresh document identifier for `create_record` calls without one.
pub(crate) fn generate_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Document store collaborator
///
/// Backends map their own failures to `AppError::PersistenceFailure`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document. `id: None` lets the store assign one; an id that
    /// already exists in the collection is rejected.
    async fn create_record(
        &self,
        collection: &str,
        id: Option<String>,
        fields: Map<String, JsonValue>,
        permissions: Vec<String>,
    ) -> Result<Document, AppError>;

    async fn get_record(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// Documents of a collection, newest first
    async fn list_records(
        &self,
        collection: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> Result<(), AppError>;

    fn backend_name(&self) -> &'static str;
}
