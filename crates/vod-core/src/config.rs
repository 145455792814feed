//! Configuration module
//!
//! Server, document store, object storage and ingestion settings, read from
//! the process environment (and `.env` when present).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_VIDEOS_COLLECTION;
use crate::storage_types::{DocumentStoreBackend, StorageBackend};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 256;
const MAX_VIDEO_SIZE_MB: usize = 2048;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const INGEST_TIMEOUT_SECS: u64 = 300;
const VIDEO_ALLOWED_CONTENT_TYPES: &str =
    "video/mp4,video/quicktime,video/x-msvideo,video/webm,video/x-matroska";
const THUMBNAIL_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// `json` switches the log output to JSON lines
    pub log_format: String,
    pub http_concurrency_limit: usize,
}

/// Upload ingestion service configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    // Document store
    pub document_store_backend: DocumentStoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub videos_collection: String,
    // Object storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Spaces, ...)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Ingestion
    pub staging_dir: PathBuf,
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
    pub thumbnail_allowed_content_types: Vec<String>,
    pub ingest_timeout_secs: u64,
    /// Delete already-stored binaries when a later stage fails
    pub compensate_orphans: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_ingest().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_ingest().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn log_json(&self) -> bool {
        self.as_ingest().base.log_format.eq_ignore_ascii_case("json")
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_ingest().base.http_concurrency_limit
    }

    pub fn document_store_backend(&self) -> DocumentStoreBackend {
        self.as_ingest().document_store_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_ingest().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_ingest().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_ingest().db_timeout_seconds
    }

    pub fn videos_collection(&self) -> &str {
        &self.as_ingest().videos_collection
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_ingest().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_ingest().local_storage_base_url.as_deref()
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        &self.as_ingest().staging_dir
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_ingest().max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.as_ingest().max_thumbnail_size_bytes
    }

    pub fn video_allowed_content_types(&self) -> &[String] {
        &self.as_ingest().video_allowed_content_types
    }

    pub fn thumbnail_allowed_content_types(&self) -> &[String] {
        &self.as_ingest().thumbnail_allowed_content_types
    }

    pub fn ingest_timeout(&self) -> Duration {
        Duration::from_secs(self.as_ingest().ingest_timeout_secs)
    }

    pub fn compensate_orphans(&self) -> bool {
        self.as_ingest().compensate_orphans
    }

    /// Upper bound for a whole upload request body: both files plus form overhead.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_video_size_bytes()
            .saturating_add(self.max_thumbnail_size_bytes())
            .saturating_add(1024 * 1024)
    }
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            log_format: "text".to_string(),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            document_store_backend: DocumentStoreBackend::Memory,
            database_url: None,
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            videos_collection: DEFAULT_VIDEOS_COLLECTION.to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: Some("./data/media".to_string()),
            local_storage_base_url: Some(format!("http://localhost:{}/media", SERVER_PORT)),
            staging_dir: env::temp_dir().join("vod-staging"),
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
            video_allowed_content_types: split_list(VIDEO_ALLOWED_CONTENT_TYPES),
            thumbnail_allowed_content_types: split_list(THUMBNAIL_ALLOWED_CONTENT_TYPES),
            ingest_timeout_secs: INGEST_TIMEOUT_SECS,
            compensate_orphans: false,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
        .unwrap_or(default)
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        // Postgres when a database is configured, in-memory otherwise
        let document_store_backend = match env::var("DOCUMENT_STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) if database_url.is_some() => DocumentStoreBackend::Postgres,
            Err(_) => DocumentStoreBackend::Memory,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let config = IngestConfig {
            base,
            document_store_backend,
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            videos_collection: env::var("VIDEOS_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_VIDEOS_COLLECTION.to_string()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir().join("vod-staging")),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_MB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_VIDEO_SIZE_MB)
                * 1024
                * 1024,
            max_thumbnail_size_bytes: env::var("MAX_THUMBNAIL_SIZE_MB")
                .unwrap_or_else(|_| MAX_THUMBNAIL_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_THUMBNAIL_SIZE_MB)
                * 1024
                * 1024,
            video_allowed_content_types: split_list(
                &env::var("VIDEO_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| VIDEO_ALLOWED_CONTENT_TYPES.to_string()),
            ),
            thumbnail_allowed_content_types: split_list(
                &env::var("THUMBNAIL_ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| THUMBNAIL_ALLOWED_CONTENT_TYPES.to_string()),
            ),
            ingest_timeout_secs: env::var("INGEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| INGEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(INGEST_TIMEOUT_SECS),
            compensate_orphans: env_flag("INGEST_COMPENSATE_ORPHANS", false),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.document_store_backend == DocumentStoreBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when DOCUMENT_STORE_BACKEND=postgres"
                    ))
                }
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set when STORAGE_BACKEND=s3"));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when STORAGE_BACKEND=s3"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                    ));
                }
            }
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_THUMBNAIL_SIZE_MB must be greater than zero"
            ));
        }

        if self.video_allowed_content_types.is_empty()
            || self.thumbnail_allowed_content_types.is_empty()
        {
            return Err(anyhow::anyhow!(
                "VIDEO_ALLOWED_CONTENT_TYPES and THUMBNAIL_ALLOWED_CONTENT_TYPES must not be empty"
            ));
        }

        if self.ingest_timeout_secs == 0 {
            return Err(anyhow::anyhow!("INGEST_TIMEOUT_SECS must be greater than zero"));
        }

        if self.videos_collection.trim().is_empty() {
            return Err(anyhow::anyhow!("VIDEOS_COLLECTION must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config(Box::new(IngestConfig::default()));
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert!(!config.compensate_orphans());
        assert_eq!(config.videos_collection(), "videos");
        assert!(config
            .video_allowed_content_types()
            .contains(&"video/mp4".to_string()));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let mut ingest = IngestConfig::default();
        ingest.document_store_backend = DocumentStoreBackend::Postgres;
        assert!(ingest.validate().is_err());

        ingest.database_url = Some("mysql://nope".to_string());
        assert!(ingest.validate().is_err());

        ingest.database_url = Some("postgresql://localhost/vod".to_string());
        assert!(ingest.validate().is_ok());
    }

    #[test]
    fn test_s3_requires_bucket_and_region() {
        let mut ingest = IngestConfig::default();
        ingest.storage_backend = StorageBackend::S3;
        assert!(ingest.validate().is_err());

        ingest.s3_bucket = Some("videos".to_string());
        assert!(ingest.validate().is_err());

        ingest.aws_region = Some("eu-west-1".to_string());
        assert!(ingest.validate().is_ok());
    }

    #[test]
    fn test_split_list_normalizes_entries() {
        assert_eq!(
            split_list(" Video/MP4 , ,video/webm"),
            vec!["video/mp4".to_string(), "video/webm".to_string()]
        );
    }

    #[test]
    fn test_max_request_body_covers_both_files() {
        let config = Config(Box::new(IngestConfig::default()));
        assert!(
            config.max_request_body_bytes()
                > config.max_video_size_bytes() + config.max_thumbnail_size_bytes()
        );
    }
}
