//! Form field names and collection defaults shared by the API and the repository.

/// Multipart field names accepted by the upload endpoint.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const DURATION: &str = "duration";
    pub const IS_PREMIUM: &str = "isPremium";
    pub const GENRE: &str = "genre";
    pub const TAGS: &str = "tags";
    pub const VIDEO_FILE: &str = "videoFile";
    pub const THUMBNAIL_FILE: &str = "thumbnailFile";
    pub const TEAM_ID: &str = "teamId";
}

/// Collection that holds video metadata documents
pub const DEFAULT_VIDEOS_COLLECTION: &str = "videos";

/// Lifetime of signed URLs handed out for private objects
pub const SIGNED_URL_TTL_SECS: u64 = 3600;
