//! VOD Core Library
//!
//! Domain models, error types and configuration shared by the storage,
//! document store and HTTP crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AccessControlList, Action, AssetKind, NewVideoRecord, Permission, Principal, StoredAsset,
    VideoRecord,
};
pub use storage_types::{DocumentStoreBackend, StorageBackend, Visibility};
