//! Streaming multipart reader for the upload form.

use super::staging::{StagedFile, StagingArea};
use super::types::IngestOptions;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;
use tokio::io::AsyncWriteExt;
use vod_core::constants::fields;
use vod_core::{AppError, AssetKind};

/// Longest accepted value for a text part
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

const TEXT_FIELDS: &[&str] = &[
    fields::TITLE,
    fields::DESCRIPTION,
    fields::DURATION,
    fields::IS_PREMIUM,
    fields::GENRE,
    fields::TAGS,
    fields::TEAM_ID,
];

/// Raw form contents: one value per text field, file parts staged on disk.
#[derive(Debug, Default)]
pub struct UploadForm {
    text: HashMap<&'static str, String>,
    pub video: Option<StagedFile>,
    pub thumbnail: Option<StagedFile>,
}

impl UploadForm {
    pub fn text(&self, field: &str) -> Option<&str> {
        self.text.get(field).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn with_text(mut self, field: &'static str, value: &str) -> Self {
        self.text.insert(field, value.to_string());
        self
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::MalformedBody(e.body_text())
    }
}

/// Consume the whole multipart stream.
///
/// File parts are written chunk by chunk to the staging area; nothing larger
/// than a text field is ever held in memory.
pub async fn read_upload_form(
    multipart: &mut Multipart,
    staging: &StagingArea,
    options: &IngestOptions,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            fields::VIDEO_FILE => {
                ensure_single(form.video.is_some(), fields::VIDEO_FILE)?;
                let staged = stage_file(
                    &mut field,
                    staging,
                    AssetKind::Video,
                    options.max_video_size_bytes,
                )
                .await?;
                form.video = Some(staged);
            }
            fields::THUMBNAIL_FILE => {
                ensure_single(form.thumbnail.is_some(), fields::THUMBNAIL_FILE)?;
                let staged = stage_file(
                    &mut field,
                    staging,
                    AssetKind::Thumbnail,
                    options.max_thumbnail_size_bytes,
                )
                .await?;
                form.thumbnail = Some(staged);
            }
            other => match TEXT_FIELDS.iter().find(|known| **known == other) {
                Some(&known) => {
                    ensure_single(form.text.contains_key(known), known)?;
                    let value = read_text(&mut field, known).await?;
                    form.text.insert(known, value);
                }
                None => {
                    tracing::debug!(field = %other, "Ignoring unknown multipart field");
                    while field.chunk().await.map_err(multipart_error)?.is_some() {}
                }
            },
        }
    }

    Ok(form)
}

fn ensure_single(already_seen: bool, field: &str) -> Result<(), AppError> {
    if already_seen {
        return Err(AppError::invalid_input(field, "must be sent only once"));
    }
    Ok(())
}

async fn read_text(field: &mut Field<'_>, name: &str) -> Result<String, AppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(AppError::invalid_input(
                name,
                format!("value exceeds {} bytes", MAX_TEXT_FIELD_BYTES),
            ));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf).map_err(|_| AppError::invalid_input(name, "must be valid UTF-8"))
}

async fn stage_file(
    field: &mut Field<'_>,
    staging: &StagingArea,
    kind: AssetKind,
    max_size: usize,
) -> Result<StagedFile, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let (mut staged, mut file) = staging.stage(kind, file_name, content_type)?;

    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        written += chunk.len() as u64;
        if written > max_size as u64 {
            return Err(AppError::PayloadTooLarge(format!(
                "{} file exceeds maximum allowed size of {} MB",
                kind,
                max_size / 1024 / 1024
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    staged.set_size(written);

    tracing::debug!(
        kind = %kind,
        size_bytes = written,
        file_name = ?staged.file_name(),
        "Staged upload part"
    );

    Ok(staged)
}
