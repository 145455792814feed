//! Test helpers: build the router over temp-dir storage and an in-memory
//! document store.
//!
//! Run with: `cargo test -p vod-api`

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::{FailingDocumentStore, RecordingStorage};
use tempfile::TempDir;
use vod_api::constants;
use vod_api::setup::{routes, services};
use vod_core::{AssetKind, BaseConfig, Config, IngestConfig, StorageBackend};
use vod_db::{DocumentStore, InMemoryDocumentStore};
use vod_storage::LocalStorage;

pub const MEDIA_BASE_URL: &str = "http://media.test/files";

/// API path prefix for tests (e.g. `/api/v0/videos`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

#[derive(Default)]
pub struct TestAppOptions {
    /// Make the storage backend fail for this kind of asset
    pub fail_storage_on: Option<AssetKind>,
    /// Make every document store write fail
    pub fail_persistence: bool,
    pub compensate_orphans: bool,
    pub max_video_size_bytes: Option<usize>,
    pub max_thumbnail_size_bytes: Option<usize>,
    pub ingest_timeout_secs: Option<u64>,
    /// Stall streamed uploads, to exercise the ingest timeout
    pub storage_delay: Option<std::time::Duration>,
}

pub struct TestApp {
    pub server: TestServer,
    pub documents: Arc<InMemoryDocumentStore>,
    pub storage: Arc<RecordingStorage>,
    pub staging_dir: PathBuf,
    pub collection: String,
    /// Limit enforced on the whole request body
    pub request_body_limit: usize,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of records persisted so far
    pub async fn record_count(&self) -> usize {
        self.documents.count(&self.collection).await
    }

    /// Number of files left in the staging directory
    pub fn staged_file_count(&self) -> usize {
        count_entries(&self.staging_dir)
    }
}

pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let staging_dir = temp_dir.path().join("staging");
    let media_dir = temp_dir.path().join("media");

    let mut ingest = IngestConfig {
        base: BaseConfig {
            environment: "test".to_string(),
            ..BaseConfig::default()
        },
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(media_dir.display().to_string()),
        local_storage_base_url: Some(MEDIA_BASE_URL.to_string()),
        staging_dir: staging_dir.clone(),
        compensate_orphans: options.compensate_orphans,
        ..IngestConfig::default()
    };
    if let Some(max) = options.max_video_size_bytes {
        ingest.max_video_size_bytes = max;
    }
    if let Some(max) = options.max_thumbnail_size_bytes {
        ingest.max_thumbnail_size_bytes = max;
    }
    if let Some(secs) = options.ingest_timeout_secs {
        ingest.ingest_timeout_secs = secs;
    }
    let config = Config(Box::new(ingest));
    config.validate().expect("Test config should be valid");

    let local = LocalStorage::new(media_dir.clone(), MEDIA_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    let mut recording = RecordingStorage::new(local, options.fail_storage_on);
    if let Some(delay) = options.storage_delay {
        recording = recording.with_delay(delay);
    }
    let storage = Arc::new(recording);

    let documents = Arc::new(InMemoryDocumentStore::new());
    let document_store: Arc<dyn DocumentStore> = if options.fail_persistence {
        Arc::new(FailingDocumentStore)
    } else {
        documents.clone()
    };

    let state = services::initialize_services(&config, document_store, storage.clone())
        .await
        .expect("Failed to initialize services");
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        documents,
        storage,
        staging_dir,
        collection: config.videos_collection().to_string(),
        request_body_limit: config.max_request_body_bytes(),
        _temp_dir: temp_dir,
    }
}
