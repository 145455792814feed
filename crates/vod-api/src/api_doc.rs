//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services::IngestOutcome;
use vod_core::models;

/// The OpenAPI document for the current API version.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VOD Upload API",
        version = "0.1.0",
        description = "Video-on-demand upload ingestion (v0). A multipart upload carries the video metadata, the video binary and its thumbnail; both binaries go to object storage and a metadata record with an access-control list is written to the document store."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
        handlers::video_get::list_videos,
    ),
    components(
        schemas(
            models::VideoRecord,
            models::AssetKind,
            IngestOutcome,
            handlers::video_upload::VideoUploadForm,
            handlers::video_get::ListQuery,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video upload and retrieval")
    )
)]
pub struct ApiDoc;
