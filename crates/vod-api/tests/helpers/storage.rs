//! Storage and document store doubles.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncRead;
use vod_core::{AppError, AssetKind, StorageBackend, StoredAsset, Visibility};
use vod_db::{Document, DocumentStore};
use vod_storage::{LocalStorage, Storage, StorageError, StorageResult};

/// Local storage that records every call and can fail one kind of asset.
pub struct RecordingStorage {
    inner: LocalStorage,
    fail_on: Option<AssetKind>,
    delay: Option<Duration>,
    uploads: Mutex<Vec<StoredAsset>>,
    deletes: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub fn new(inner: LocalStorage, fail_on: Option<AssetKind>) -> Self {
        Self {
            inner,
            fail_on,
            delay: None,
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    /// Stall every streamed upload for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn uploads(&self) -> Vec<StoredAsset> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    fn kind_of(content_type: &str) -> AssetKind {
        if content_type.starts_with("image/") {
            AssetKind::Thumbnail
        } else {
            AssetKind::Video
        }
    }

    fn check(&self, content_type: &str) -> StorageResult<()> {
        if self.fail_on == Some(Self::kind_of(content_type)) {
            return Err(StorageError::UploadFailed("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
        visibility: Visibility,
    ) -> StorageResult<StoredAsset> {
        self.check(content_type)?;
        let asset = self
            .inner
            .upload(filename, content_type, data, visibility)
            .await?;
        self.uploads.lock().unwrap().push(asset.clone());
        Ok(asset)
    }

    async fn upload_stream(
        &self,
        filename: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        visibility: Visibility,
    ) -> StorageResult<StoredAsset> {
        self.check(content_type)?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let asset = self
            .inner
            .upload_stream(filename, content_type, content_length, reader, visibility)
            .await?;
        self.uploads.lock().unwrap().push(asset.clone());
        Ok(asset)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.lock().unwrap().push(storage_key.to_string());
        self.inner.delete(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Document store whose writes always fail.
pub struct FailingDocumentStore;

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn create_record(
        &self,
        _collection: &str,
        _id: Option<String>,
        _fields: Map<String, JsonValue>,
        _permissions: Vec<String>,
    ) -> Result<Document, AppError> {
        Err(AppError::PersistenceFailure(
            "connection refused".to_string(),
        ))
    }

    async fn get_record(&self, _collection: &str, _id: &str) -> Result<Option<Document>, AppError> {
        Ok(None)
    }

    async fn list_records(
        &self,
        _collection: &str,
        _limit: i64,
        _offset: i64,
    ) -> Result<Vec<Document>, AppError> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::PersistenceFailure(
            "connection refused".to_string(),
        ))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
