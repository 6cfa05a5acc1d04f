use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{OwnerSummary, Video, VideoWithOwner, WatchHistoryEntry};

/// Record a watch event. Re-watching the same video moves it to the top of
/// the history instead of adding a duplicate row.
pub async fn record_watch(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id)
        DO UPDATE SET watched_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// The user's watch history, most recent first, each entry carrying the
/// video and its owner projection.
pub async fn list_watch_history(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<WatchHistoryEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT h.watched_at,
               v.id, v.owner_id, v.title, v.description, v.video_url, v.video_key,
               v.thumbnail_url, v.thumbnail_key, v.duration_secs, v.views, v.is_published,
               v.created_at, v.updated_at,
               u.username AS owner_username, u.fullname AS owner_fullname,
               u.avatar_url AS owner_avatar
        FROM watch_history h
        JOIN videos v ON v.id = h.video_id
        JOIN users u ON u.id = v.owner_id
        WHERE h.user_id = $1
        ORDER BY h.watched_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let entries = rows
        .iter()
        .map(|r| WatchHistoryEntry {
            video: VideoWithOwner {
                video: Video {
                    id: r.get("id"),
                    owner_id: r.get("owner_id"),
                    title: r.get("title"),
                    description: r.get("description"),
                    video_url: r.get("video_url"),
                    video_key: r.get("video_key"),
                    thumbnail_url: r.get("thumbnail_url"),
                    thumbnail_key: r.get("thumbnail_key"),
                    duration_secs: r.get("duration_secs"),
                    views: r.get("views"),
                    is_published: r.get("is_published"),
                    created_at: r.get("created_at"),
                    updated_at: r.get("updated_at"),
                },
                owner: OwnerSummary {
                    id: r.get("owner_id"),
                    username: r.get("owner_username"),
                    fullname: r.get("owner_fullname"),
                    avatar: r.get("owner_avatar"),
                },
            },
            watched_at: r.get("watched_at"),
        })
        .collect();

    Ok(entries)
}
