use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Video metadata as persisted in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Identifier assigned by the document store
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_seconds: u32,
    pub is_premium: bool,
    pub genre: String,
    /// Comma-delimited tag list, stored as submitted
    pub tags: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub views_count: u64,
    pub upload_timestamp: DateTime<Utc>,
}

/// Field values of a record that has not been written yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideoRecord {
    pub title: String,
    pub description: String,
    pub duration_seconds: u32,
    pub is_premium: bool,
    pub genre: String,
    pub tags: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub views_count: u64,
    pub upload_timestamp: DateTime<Utc>,
}

impl NewVideoRecord {
    pub fn into_record(self, id: String) -> VideoRecord {
        VideoRecord {
            id,
            title: self.title,
            description: self.description,
            duration_seconds: self.duration_seconds,
            is_premium: self.is_premium,
            genre: self.genre,
            tags: self.tags,
            video_url: self.video_url,
            thumbnail_url: self.thumbnail_url,
            views_count: self.views_count,
            upload_timestamp: self.upload_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewVideoRecord {
        NewVideoRecord {
            title: "Trailer".to_string(),
            description: "Teaser".to_string(),
            duration_seconds: 120,
            is_premium: true,
            genre: "Action".to_string(),
            tags: "trailer, action,,".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            thumbnail_url: "https://cdn.example.com/t.jpg".to_string(),
            views_count: 0,
            upload_timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = sample().into_record("abc".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["durationSeconds"], 120);
        assert_eq!(json["isPremium"], true);
        assert_eq!(json["viewsCount"], 0);
        assert_eq!(json["videoUrl"], "https://cdn.example.com/v.mp4");
        assert!(json.get("uploadTimestamp").is_some());
    }
}
