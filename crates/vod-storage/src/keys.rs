//! Shared key generation for storage backends.

use uuid::Uuid;

/// Generate a fresh storage key `media/{uuid}/{filename}`.
pub fn generate_storage_key(filename: &str) -> String {
    format!("media/{}/{}", Uuid::new_v4(), filename)
}
