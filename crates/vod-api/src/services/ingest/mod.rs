//! Upload ingestion: multipart parsing, validation, staging and the pipeline
//! that stores both binaries and persists the video record.

pub mod form;
pub mod pipeline;
pub mod staging;
pub mod types;
pub mod validate;

pub use pipeline::IngestPipeline;
pub use staging::{StagedFile, StagingArea};
pub use types::{IngestOptions, IngestOutcome};
