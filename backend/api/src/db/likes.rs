use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{LikedVideo, ToggleOutcome, Video};

/// Which column of the likes table a toggle targets.
#[derive(Debug, Clone, Copy)]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    fn column(self) -> &'static str {
        match self {
            LikeTarget::Video => "video_id",
            LikeTarget::Comment => "comment_id",
            LikeTarget::Tweet => "tweet_id",
        }
    }
}

/// Toggle a like. The partial unique index on (liked_by, target) makes the
/// insert race-safe: a concurrent duplicate insert hits the conflict clause
/// and falls through to delete. `None` means both the insert and the delete
/// lost a race and the caller should report a conflict.
pub async fn toggle_like(
    pool: &PgPool,
    user_id: Uuid,
    target: LikeTarget,
    target_id: Uuid,
) -> Result<Option<ToggleOutcome>, sqlx::Error> {
    let column = target.column();

    let inserted = sqlx::query(&format!(
        r#"
        INSERT INTO likes (liked_by, {column})
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#
    ))
    .bind(user_id)
    .bind(target_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        return Ok(Some(ToggleOutcome::Created));
    }

    let deleted = sqlx::query(&format!(
        "DELETE FROM likes WHERE liked_by = $1 AND {column} = $2 RETURNING id"
    ))
    .bind(user_id)
    .bind(target_id)
    .fetch_optional(pool)
    .await?;

    Ok(deleted.map(|_| ToggleOutcome::Removed))
}

fn liked_video_from_row(row: &PgRow) -> LikedVideo {
    LikedVideo {
        liked_at: row.get("liked_at"),
        video: Video {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            title: row.get("title"),
            description: row.get("description"),
            video_url: row.get("video_url"),
            video_key: row.get("video_key"),
            thumbnail_url: row.get("thumbnail_url"),
            thumbnail_key: row.get("thumbnail_key"),
            duration_secs: row.get("duration_secs"),
            views: row.get("views"),
            is_published: row.get("is_published"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        },
    }
}

/// Videos the user has liked, most recent like first.
pub async fn list_liked_videos(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<LikedVideo>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT l.created_at AS liked_at,
               v.id, v.owner_id, v.title, v.description, v.video_url, v.video_key,
               v.thumbnail_url, v.thumbnail_key, v.duration_secs, v.views, v.is_published,
               v.created_at, v.updated_at
        FROM likes l
        JOIN videos v ON v.id = l.video_id
        WHERE l.liked_by = $1 AND l.video_id IS NOT NULL
        ORDER BY l.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(liked_video_from_row).collect())
}
