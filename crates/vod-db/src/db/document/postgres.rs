//! Postgres-backed document store over the `documents` table.

use super::{generate_document_id, Document, DocumentStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use vod_core::AppError;

/// Row type for the documents table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    collection: String,
    fields: Json<JsonValue>,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document, AppError> {
        let fields = match self.fields.0 {
            JsonValue::Object(map) => map,
            other => {
                return Err(AppError::PersistenceFailure(format!(
                    "Document {} in {} has non-object fields: {}",
                    self.id, self.collection, other
                )))
            }
        };
        Ok(Document {
            id: self.id,
            collection: self.collection,
            fields,
            permissions: self.permissions,
            created_at: self.created_at,
        })
    }
}

fn store_error(err: sqlx::Error) -> AppError {
    AppError::PersistenceFailure(err.to_string())
}

#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[tracing::instrument(skip(self, values, permissions), fields(db.table = "documents"))]
    async fn create_record(
        &self,
        collection: &str,
        id: Option<String>,
        values: Map<String, JsonValue>,
        permissions: Vec<String>,
    ) -> Result<Document, AppError> {
        let id = id.unwrap_or_else(generate_document_id);

        let row: DocumentRow = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            INSERT INTO documents (id, collection, fields, permissions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, collection, fields, permissions, created_at
            "#,
        )
        .bind(&id)
        .bind(collection)
        .bind(Json(JsonValue::Object(values)))
        .bind(&permissions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::PersistenceFailure(format!(
                    "Document {} already exists in {}",
                    id, collection
                ))
            }
            other => store_error(other),
        })?;

        row.into_document()
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.record_id = %id))]
    async fn get_record(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let row: Option<DocumentRow> = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            SELECT id, collection, fields, permissions, created_at
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(DocumentRow::into_document).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents"))]
    async fn list_records(
        &self,
        collection: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Document>, AppError> {
        let rows: Vec<DocumentRow> = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            SELECT id, collection, fields, permissions, created_at
            FROM documents
            WHERE collection = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(collection)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: JsonValue) -> DocumentRow {
        DocumentRow {
            id: "abc".to_string(),
            collection: "videos".to_string(),
            fields: Json(fields),
            permissions: vec!["read(\"any\")".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_into_document() {
        let document = row(serde_json::json!({ "title": "Trailer" }))
            .into_document()
            .unwrap();
        assert_eq!(document.id, "abc");
        assert_eq!(document.fields["title"], "Trailer");
        assert_eq!(document.permissions, vec!["read(\"any\")".to_string()]);
    }

    #[test]
    fn test_row_with_non_object_fields_is_rejected() {
        let err = row(serde_json::json!([1, 2])).into_document().unwrap_err();
        assert!(matches!(err, AppError::PersistenceFailure(_)));
    }
}
