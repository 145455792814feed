//! Upload form fixtures.

use axum_test::multipart::{MultipartForm, Part};
use std::collections::BTreeMap;

pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 fake video payload";
pub const THUMBNAIL_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0 fake jpeg payload";

pub struct FilePart {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl FilePart {
    pub fn new(data: &[u8], file_name: &str, mime_type: &str) -> Self {
        Self {
            data: data.to_vec(),
            file_name: Some(file_name.to_string()),
            mime_type: Some(mime_type.to_string()),
        }
    }

    /// A part with neither a filename nor a declared media type
    pub fn bare(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            file_name: None,
            mime_type: None,
        }
    }

    fn into_part(self) -> Part {
        let mut part = Part::bytes(self.data);
        if let Some(name) = self.file_name {
            part = part.file_name(name);
        }
        if let Some(mime) = self.mime_type {
            part = part.mime_type(mime);
        }
        part
    }
}

/// Upload form with sensible defaults; tweak with `with`/`without`.
pub struct UploadFormBuilder {
    text: BTreeMap<String, String>,
    video: Option<FilePart>,
    thumbnail: Option<FilePart>,
}

impl Default for UploadFormBuilder {
    fn default() -> Self {
        let text = [
            ("title", "Trailer"),
            ("description", "Teaser"),
            ("duration", "120"),
            ("isPremium", "true"),
            ("genre", "Action"),
            ("tags", "trailer,action"),
            ("teamId", "team-7"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            text,
            video: Some(FilePart::new(VIDEO_BYTES, "trailer.mp4", "video/mp4")),
            thumbnail: Some(FilePart::new(THUMBNAIL_BYTES, "thumb.jpg", "image/jpeg")),
        }
    }
}

impl UploadFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.text.insert(field.to_string(), value.to_string());
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        match field {
            "videoFile" => self.video = None,
            "thumbnailFile" => self.thumbnail = None,
            _ => {
                self.text.remove(field);
            }
        }
        self
    }

    pub fn video(mut self, part: FilePart) -> Self {
        self.video = Some(part);
        self
    }

    pub fn thumbnail(mut self, part: FilePart) -> Self {
        self.thumbnail = Some(part);
        self
    }

    pub fn build(self) -> MultipartForm {
        let mut form = MultipartForm::new();
        for (field, value) in self.text {
            form = form.add_text(field, value);
        }
        if let Some(video) = self.video {
            form = form.add_part("videoFile", video.into_part());
        }
        if let Some(thumbnail) = self.thumbnail {
            form = form.add_part("thumbnailFile", thumbnail.into_part());
        }
        form
    }
}
