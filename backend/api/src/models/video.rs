use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Video entity
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    #[serde(skip_serializing)]
    pub video_key: String,
    pub thumbnail_url: String,
    #[serde(skip_serializing)]
    pub thumbnail_key: String,
    pub duration_secs: i32,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner projection attached to videos, comments, and watch history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoWithOwner {
    #[serde(flatten)]
    pub video: Video,
    pub owner: OwnerSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    #[serde(flatten)]
    pub video: VideoWithOwner,
    pub watched_at: DateTime<Utc>,
}

/// Listing query: `?page&limit&query&sortBy&sortType&userId`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<Uuid>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl VideoListQuery {
    /// Same skip/limit translation as [`crate::models::PageQuery`]
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit.max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.max(0)
    }
}

/// Whitelisted sort keys; anything else falls back to creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortKey {
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("views") => VideoSortKey::Views,
            Some("duration") => VideoSortKey::Duration,
            Some("title") => VideoSortKey::Title,
            _ => VideoSortKey::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            VideoSortKey::CreatedAt => "v.created_at",
            VideoSortKey::Views => "v.views",
            VideoSortKey::Duration => "v.duration_secs",
            VideoSortKey::Title => "v.title",
        }
    }
}

/// Sort direction, descending unless "asc" is requested
pub fn sort_direction(raw: Option<&str>) -> &'static str {
    match raw {
        Some("asc") => "ASC",
        _ => "DESC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_whitelist() {
        assert_eq!(VideoSortKey::parse(Some("views")), VideoSortKey::Views);
        assert_eq!(VideoSortKey::parse(Some("title")), VideoSortKey::Title);
        // Unknown keys never reach the SQL string
        assert_eq!(
            VideoSortKey::parse(Some("views; DROP TABLE videos")),
            VideoSortKey::CreatedAt
        );
        assert_eq!(VideoSortKey::parse(None), VideoSortKey::CreatedAt);
    }

    #[test]
    fn list_query_paginates_like_page_query() {
        let q = VideoListQuery {
            page: 3,
            limit: 5,
            query: None,
            sort_by: None,
            sort_type: None,
            user_id: None,
        };
        assert_eq!(q.offset(), 10);
        assert_eq!(q.limit(), 5);

        // Out-of-range values clamp the same way as PageQuery: first page,
        // never a negative limit, no upper bound
        let q = VideoListQuery {
            page: 0,
            limit: 500,
            query: None,
            sort_by: None,
            sort_type: None,
            user_id: None,
        };
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 500);
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        assert_eq!(sort_direction(Some("asc")), "ASC");
        assert_eq!(sort_direction(Some("desc")), "DESC");
        assert_eq!(sort_direction(Some("sideways")), "DESC");
        assert_eq!(sort_direction(None), "DESC");
    }

    #[test]
    fn storage_keys_stay_out_of_responses() {
        let video = Video {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Intro".to_string(),
            description: "First video".to_string(),
            video_url: "https://cdn.vidtube.dev/v.mp4".to_string(),
            video_key: "media/v.mp4".to_string(),
            thumbnail_url: "https://cdn.vidtube.dev/t.png".to_string(),
            thumbnail_key: "media/t.png".to_string(),
            duration_secs: 120,
            views: 0,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&video).expect("serialize");
        assert!(value.get("videoKey").is_none());
        assert!(value.get("thumbnailKey").is_none());
        assert_eq!(value["isPublished"], true);
    }
}
