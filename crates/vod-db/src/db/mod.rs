//! Database repositories for the data access layer
//!
//! document/ holds the generic collection store and its backends; video.rs
//! maps video records onto it.
//
pub mod document;
pub mod video;
//
pub use document::{Document, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
pub use video::VideoRepository;
