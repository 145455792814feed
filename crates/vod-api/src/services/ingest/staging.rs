//! Transient on-disk staging for uploaded file parts.
//!
//! Each staged file gets a unique random name inside the staging directory and
//! is removed when its `StagedFile` is released or dropped, so every exit path
//! of an ingest run (including a timed-out or cancelled future) cleans up.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use vod_core::AssetKind;

#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Use `dir` as the staging directory, creating it if needed.
    pub async fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty staged file and a writable handle to it.
    pub fn stage(
        &self,
        kind: AssetKind,
        file_name: Option<String>,
        content_type: Option<String>,
    ) -> io::Result<(StagedFile, tokio::fs::File)> {
        let named = tempfile::Builder::new()
            .prefix(&format!("{}-", kind))
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        let (file, path) = named.into_parts();

        let staged = StagedFile {
            path: Some(path),
            kind,
            size: 0,
            file_name,
            content_type,
        };
        Ok((staged, tokio::fs::File::from_std(file)))
    }
}

/// A file part written to the staging area
#[derive(Debug)]
pub struct StagedFile {
    path: Option<TempPath>,
    kind: AssetKind,
    size: u64,
    file_name: Option<String>,
    content_type: Option<String>,
}

impl StagedFile {
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    /// Filename as declared by the client
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Media type as declared by the client
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Open the staged content for reading.
    pub async fn open(&self) -> io::Result<tokio::fs::File> {
        match self.path() {
            Some(path) => tokio::fs::File::open(path).await,
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "staged file already released",
            )),
        }
    }

    /// Remove the staged file now.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(path) = self.path.take() {
            let shown = path.display().to_string();
            if let Err(e) = path.close() {
                tracing::warn!(
                    error = %e,
                    path = %shown,
                    kind = %self.kind,
                    "Failed to remove staged upload file"
                );
            }
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.remove();
    }
}
