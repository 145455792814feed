//! Data models for the application
//!
//! Video metadata records, stored binary assets and the access-control
//! lists attached to documents.

mod asset;
mod permission;
mod video;

// Re-export all models for convenient imports
pub use asset::*;
pub use permission::*;
pub use video::*;
