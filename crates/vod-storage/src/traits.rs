//! The object storage collaborator.
//!
//! Backends receive a client filename and a byte source and hand back a
//! `StoredAsset` whose `id` is the object key and whose `url` resolves to it.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use vod_core::{StorageBackend, StoredAsset, Visibility};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object write failed: {0}")]
    UploadFailed(String),

    #[error("object read failed: {0}")]
    DownloadFailed(String),

    #[error("object delete failed: {0}")]
    DeleteFailed(String),

    #[error("no object stored under key {0}")]
    NotFound(String),

    #[error("rejected storage key: {0}")]
    InvalidKey(String),

    #[error("storage backend unavailable: {0}")]
    BackendError(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("storage misconfigured: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The ingestion pipeline only talks to object storage through this trait,
/// so any backend (or a test double) can be injected as `Arc<dyn Storage>`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an in-memory payload under a fresh key.
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
        visibility: Visibility,
    ) -> StorageResult<StoredAsset>;

    /// Stream an upload from `reader` under a fresh key.
    ///
    /// The reader is consumed until EOF without buffering the whole payload.
    /// `content_length` is a hint for logging and backends that can use it.
    async fn upload_stream(
        &self,
        filename: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        visibility: Visibility,
    ) -> StorageResult<StoredAsset>;

    /// Whole object contents
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}
