//! VOD Storage Library
//!
//! Object storage abstraction used by the ingestion pipeline, with S3 and
//! local filesystem implementations.
//!
//! # Storage key format
//!
//! Every stored object gets a fresh key of the form `media/{uuid}/{filename}`,
//! so two uploads with the same client filename never collide. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so all backends stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vod_core::{StorageBackend, StoredAsset, Visibility};
