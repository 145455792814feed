//! VOD document store
//!
//! The pipeline persists one metadata document per upload. Documents live in
//! named collections and carry an access-control list of permission strings.

pub mod db;

pub use db::{
    Document, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, VideoRepository,
};
