use crate::error::{ErrorResponse, HttpAppError};
use crate::services::IngestOutcome;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// Multipart body of a video upload (documentation only; the body is streamed)
#[derive(serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct VideoUploadForm {
    title: String,
    description: String,
    /// Duration in whole seconds, > 0
    duration: String,
    /// Only the literal "true" marks the video premium
    is_premium: Option<String>,
    genre: Option<String>,
    /// Comma-delimited tags
    tags: Option<String>,
    /// Team granted update/delete on the record
    team_id: Option<String>,
    #[schema(value_type = String, format = Binary)]
    video_file: Vec<u8>,
    #[schema(value_type = String, format = Binary)]
    thumbnail_file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/v0/videos",
    tag = "videos",
    request_body(content = VideoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = IngestOutcome),
        (status = 400, description = "Malformed body or invalid field", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage or persistence failure", body = ErrorResponse),
        (status = 504, description = "Upload timed out", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let multipart = multipart?;
    let outcome = state.ingest.ingest(multipart).await?;
    Ok(Json(outcome))
}
