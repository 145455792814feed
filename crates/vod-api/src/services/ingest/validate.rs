//! Form validation: turns raw form contents into a typed upload or the first
//! field-level error.

use super::form::UploadForm;
use super::staging::StagedFile;
use super::types::IngestOptions;
use crate::utils::upload::{
    generated_filename, resolve_content_type, sanitize_filename, validate_content_type,
    OCTET_STREAM,
};
use vod_core::constants::fields;
use vod_core::AppError;

/// Descriptive metadata supplied with the upload
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub duration_seconds: u32,
    pub is_premium: bool,
    pub genre: String,
    pub tags: String,
}

/// A staged file part ready to be stored
#[derive(Debug)]
pub struct PreparedAsset {
    pub staged: StagedFile,
    pub content_type: String,
    pub file_name: String,
}

#[derive(Debug)]
pub struct ValidatedUpload {
    pub metadata: VideoMetadata,
    pub team_id: Option<String>,
    pub video: PreparedAsset,
    pub thumbnail: PreparedAsset,
}

/// Validate in field order: title, description, duration, videoFile,
/// thumbnailFile. Staged files are dropped (and removed) on error.
pub fn validate_upload(
    mut form: UploadForm,
    options: &IngestOptions,
) -> Result<ValidatedUpload, AppError> {
    let title = required_text(&form, fields::TITLE)?;
    let description = required_text(&form, fields::DESCRIPTION)?;
    let duration_seconds = parse_duration(form.text(fields::DURATION))?;

    let is_premium = form.text(fields::IS_PREMIUM) == Some("true");
    let genre = form.text(fields::GENRE).unwrap_or_default().to_string();
    let tags = form.text(fields::TAGS).unwrap_or_default().to_string();
    let team_id = form
        .text(fields::TEAM_ID)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let video = prepare_asset(
        form.video.take(),
        fields::VIDEO_FILE,
        &options.video_allowed_content_types,
    )?;
    let thumbnail = prepare_asset(
        form.thumbnail.take(),
        fields::THUMBNAIL_FILE,
        &options.thumbnail_allowed_content_types,
    )?;

    Ok(ValidatedUpload {
        metadata: VideoMetadata {
            title,
            description,
            duration_seconds,
            is_premium,
            genre,
            tags,
        },
        team_id,
        video,
        thumbnail,
    })
}

fn required_text(form: &UploadForm, field: &str) -> Result<String, AppError> {
    match form.text(field).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(AppError::invalid_input(field, "is required")),
    }
}

fn parse_duration(value: Option<&str>) -> Result<u32, AppError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::invalid_input(fields::DURATION, "is required"))?;

    let seconds = match value.parse::<u64>() {
        Ok(seconds) if seconds > 0 => seconds,
        _ => {
            return Err(AppError::invalid_input(
                fields::DURATION,
                "must be a positive integer number of seconds",
            ))
        }
    };

    u32::try_from(seconds).map_err(|_| {
        AppError::invalid_input(
            fields::DURATION,
            format!("must not exceed {} seconds", u32::MAX),
        )
    })
}

fn prepare_asset(
    staged: Option<StagedFile>,
    field: &str,
    allowed_types: &[String],
) -> Result<PreparedAsset, AppError> {
    let staged = staged.ok_or_else(|| AppError::invalid_input(field, "file is required"))?;
    if staged.size() == 0 {
        return Err(AppError::invalid_input(field, "file is empty"));
    }

    // Parts with neither a usable declared type nor a guessable filename are
    // stored as opaque bytes; the allowlist only applies to a known type.
    let content_type = match resolve_content_type(staged.content_type(), staged.file_name()) {
        Some(content_type) => {
            validate_content_type(field, &content_type, allowed_types)?;
            content_type
        }
        None => OCTET_STREAM.to_string(),
    };

    let file_name = staged
        .file_name()
        .and_then(sanitize_filename)
        .unwrap_or_else(|| generated_filename(&content_type));

    Ok(PreparedAsset {
        staged,
        content_type,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ingest::staging::StagingArea;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;
    use vod_core::AssetKind;

    fn options() -> IngestOptions {
        IngestOptions {
            max_video_size_bytes: 1024,
            max_thumbnail_size_bytes: 1024,
            video_allowed_content_types: vec!["video/mp4".to_string()],
            thumbnail_allowed_content_types: vec!["image/png".to_string()],
            timeout: Duration::from_secs(5),
            compensate_orphans: false,
        }
    }

    async fn staged(
        area: &StagingArea,
        kind: AssetKind,
        name: Option<&str>,
        content_type: Option<&str>,
        body: &[u8],
    ) -> StagedFile {
        let (mut staged, mut file) = area
            .stage(kind, name.map(String::from), content_type.map(String::from))
            .unwrap();
        file.write_all(body).await.unwrap();
        file.flush().await.unwrap();
        staged.set_size(body.len() as u64);
        staged
    }

    async fn complete_form(area: &StagingArea) -> UploadForm {
        let mut form = UploadForm::default()
            .with_text(fields::TITLE, "  Trailer ")
            .with_text(fields::DESCRIPTION, "Teaser")
            .with_text(fields::DURATION, " 120 ");
        form.video = Some(
            staged(area, AssetKind::Video, Some("trailer.mp4"), Some("video/mp4"), b"mp4").await,
        );
        form.thumbnail =
            Some(staged(area, AssetKind::Thumbnail, Some("thumb.png"), None, b"png").await);
        form
    }

    #[tokio::test]
    async fn test_valid_form() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();
        let form = complete_form(&area)
            .await
            .with_text(fields::TEAM_ID, "  ")
            .with_text(fields::TAGS, "a,b");

        let upload = validate_upload(form, &options()).unwrap();
        assert_eq!(upload.metadata.title, "Trailer");
        assert_eq!(upload.metadata.duration_seconds, 120);
        assert!(!upload.metadata.is_premium);
        assert_eq!(upload.metadata.genre, "");
        assert_eq!(upload.metadata.tags, "a,b");
        assert_eq!(upload.team_id, None);
        assert_eq!(upload.video.file_name, "trailer.mp4");
        assert_eq!(upload.thumbnail.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_is_premium_only_literal_true() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();

        for (value, expected) in [("true", true), ("TRUE", false), ("1", false), ("yes", false)] {
            let form = complete_form(&area)
                .await
                .with_text(fields::IS_PREMIUM, value);
            let upload = validate_upload(form, &options()).unwrap();
            assert_eq!(upload.metadata.is_premium, expected, "isPremium={}", value);
        }
    }

    #[tokio::test]
    async fn test_duration_rules() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();

        for value in ["abc", "0", "-5", "1.5", "", "4294967296"] {
            let form = complete_form(&area)
                .await
                .with_text(fields::DURATION, value);
            let err = validate_upload(form, &options()).unwrap_err();
            assert_eq!(err.field(), Some(fields::DURATION), "duration={:?}", value);
        }
    }

    #[tokio::test]
    async fn test_missing_title_reported_first_and_files_released() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();
        let form = complete_form(&area).await.with_text(fields::TITLE, "   ");

        let err = validate_upload(form, &options()).unwrap_err();
        assert_eq!(err.field(), Some(fields::TITLE));
        assert_eq!(std::fs::read_dir(area.dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_and_empty_files() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();

        let mut form = complete_form(&area).await;
        form.video = None;
        let err = validate_upload(form, &options()).unwrap_err();
        assert_eq!(err.field(), Some(fields::VIDEO_FILE));

        let mut form = complete_form(&area).await;
        form.thumbnail = Some(staged(&area, AssetKind::Thumbnail, None, None, b"").await);
        let err = validate_upload(form, &options()).unwrap_err();
        assert_eq!(err.field(), Some(fields::THUMBNAIL_FILE));
    }

    #[tokio::test]
    async fn test_disallowed_content_type() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();
        let mut form = complete_form(&area).await;
        form.video = Some(
            staged(&area, AssetKind::Video, Some("clip.avi"), Some("video/x-msvideo"), b"x").await,
        );

        let err = validate_upload(form, &options()).unwrap_err();
        assert_eq!(err.field(), Some(fields::VIDEO_FILE));
    }

    #[tokio::test]
    async fn test_generated_filename_when_client_sent_none() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();
        let mut form = complete_form(&area).await;
        form.video = Some(staged(&area, AssetKind::Video, None, Some("video/mp4"), b"x").await);

        let upload = validate_upload(form, &options()).unwrap();
        assert!(upload.video.file_name.ends_with(".mp4"));
        assert_ne!(upload.video.file_name, "trailer.mp4");
    }

    #[tokio::test]
    async fn test_duration_beyond_u32_reports_limit() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();
        let form = complete_form(&area)
            .await
            .with_text(fields::DURATION, "4294967296");

        let err = validate_upload(form, &options()).unwrap_err();
        assert!(err.to_string().contains("must not exceed"), "{}", err);
    }

    #[tokio::test]
    async fn test_untyped_unnamed_part_stored_as_octet_stream() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::create(temp.path()).await.unwrap();
        let mut form = complete_form(&area).await;
        form.video = Some(staged(&area, AssetKind::Video, None, None, b"x").await);

        let upload = validate_upload(form, &options()).unwrap();
        assert_eq!(upload.video.content_type, "application/octet-stream");
        assert!(upload.video.file_name.ends_with(".bin"));
    }
}
