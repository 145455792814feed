//! VOD upload API
//!
//! HTTP surface and ingestion pipeline: a multipart upload is parsed,
//! validated, its two binaries are stored in object storage and a video
//! record with an access-control list is written to the document store.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod utils;
