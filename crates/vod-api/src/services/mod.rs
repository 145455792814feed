pub mod ingest;

pub use ingest::{IngestOptions, IngestOutcome, IngestPipeline, StagingArea};
