//! Filename and media type helpers for uploaded file parts

use uuid::Uuid;
use vod_core::AppError;

const MAX_FILENAME_LENGTH: usize = 255;
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Sanitize a client-supplied filename for use in a storage key.
///
/// Directory components are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. Returns `None` when nothing usable is left (empty, traversal
/// attempts, or shorter than three characters), in which case the caller
/// generates a name.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if filename_only.contains("..") {
        return None;
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() || sanitized.len() < 3 {
        return None;
    }

    Some(sanitized)
}

/// `<uuid>.<ext>` with the extension derived from the media type.
pub fn generated_filename(content_type: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension_for(content_type))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        "video/x-matroska" => "mkv",
        "video/x-msvideo" => "avi",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        OCTET_STREAM => "bin",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("bin"),
    }
}

/// Strip parameters and lower-case ("Video/MP4; codecs=avc1" -> "video/mp4").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Media type for a file part: the declared one when meaningful, otherwise
/// guessed from the filename.
pub fn resolve_content_type(declared: Option<&str>, filename: Option<&str>) -> Option<String> {
    let declared = declared
        .map(normalize_mime_type)
        .filter(|ct| !ct.is_empty() && ct != OCTET_STREAM);
    if declared.is_some() {
        return declared;
    }

    filename
        .and_then(|name| mime_guess::from_path(name).first())
        .map(|mime| mime.essence_str().to_lowercase())
}

/// Check a resolved media type against an allowlist.
pub fn validate_content_type(
    field: &str,
    content_type: &str,
    allowed_types: &[String],
) -> Result<(), AppError> {
    if !allowed_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    {
        return Err(AppError::invalid_input(
            field,
            format!(
                "unsupported content type '{}'; allowed types: {}",
                content_type,
                allowed_types.join(", ")
            ),
        ));
    }
    Ok(())
}
