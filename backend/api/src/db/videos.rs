use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::video::{sort_direction, VideoSortKey};
use crate::models::{OwnerSummary, Video, VideoListQuery, VideoWithOwner};

const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, video_key, \
     thumbnail_url, thumbnail_key, duration_secs, views, is_published, created_at, updated_at";

fn video_from_row(row: &PgRow) -> Video {
    Video {
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
    }
}

fn owner_from_row(row: &PgRow) -> OwnerSummary {
    OwnerSummary {
        id: row.get("owner_id"),
        username: row.get("owner_username"),
        fullname: row.get("owner_fullname"),
        avatar: row.get("owner_avatar"),
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn create_video(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: &str,
    video_url: &str,
    video_key: &str,
    thumbnail_url: &str,
    thumbnail_key: &str,
    duration_secs: i32,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (owner_id, title, description, video_url, video_key,
                            thumbnail_url, thumbnail_key, duration_secs, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(video_url)
    .bind(video_key)
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .bind(duration_secs)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

pub async fn find_video_by_id(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
    ))
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(video)
}

/// Fetch a video joined with its owner projection.
pub async fn find_video_with_owner(
    pool: &PgPool,
    video_id: Uuid,
) -> Result<Option<VideoWithOwner>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT v.id, v.owner_id, v.title, v.description, v.video_url, v.video_key,
               v.thumbnail_url, v.thumbnail_key, v.duration_secs, v.views, v.is_published,
               v.created_at, v.updated_at,
               u.username AS owner_username, u.fullname AS owner_fullname,
               u.avatar_url AS owner_avatar
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| VideoWithOwner {
        video: video_from_row(&r),
        owner: owner_from_row(&r),
    }))
}

/// Paginated listing of published videos. Filters by free-text query and
/// owner; the sort column comes from a whitelist, never from user input.
pub async fn list_videos(
    pool: &PgPool,
    params: &VideoListQuery,
) -> Result<(Vec<VideoWithOwner>, i64), sqlx::Error> {
    let sort_column = VideoSortKey::parse(params.sort_by.as_deref()).column();
    let direction = sort_direction(params.sort_type.as_deref());

    let pattern = params
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(|q| format!("%{}%", q.trim()));

    let rows = sqlx::query(&format!(
        r#"
        SELECT v.id, v.owner_id, v.title, v.description, v.video_url, v.video_key,
               v.thumbnail_url, v.thumbnail_key, v.duration_secs, v.views, v.is_published,
               v.created_at, v.updated_at,
               u.username AS owner_username, u.fullname AS owner_fullname,
               u.avatar_url AS owner_avatar
        FROM videos v
        JOIN users u ON u.id = v.owner_id
        WHERE v.is_published = TRUE
          AND ($1::text IS NULL OR v.title ILIKE $1 OR v.description ILIKE $1)
          AND ($2::uuid IS NULL OR v.owner_id = $2)
        ORDER BY {sort_column} {direction}
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(pattern.as_deref())
    .bind(params.user_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    let total = sqlx::query(
        r#"
        SELECT COUNT(*) AS total
        FROM videos v
        WHERE v.is_published = TRUE
          AND ($1::text IS NULL OR v.title ILIKE $1 OR v.description ILIKE $1)
          AND ($2::uuid IS NULL OR v.owner_id = $2)
        "#,
    )
    .bind(pattern.as_deref())
    .bind(params.user_id)
    .fetch_one(pool)
    .await?
    .get::<i64, _>("total");

    let videos = rows
        .iter()
        .map(|r| VideoWithOwner {
            video: video_from_row(r),
            owner: owner_from_row(r),
        })
        .collect();

    Ok((videos, total))
}

/// All of a channel's own videos, unpublished included. Dashboard only.
pub async fn list_videos_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Video>, i64), sqlx::Error> {
    let videos = sqlx::query_as::<_, Video>(&format!(
        r#"
        SELECT {VIDEO_COLUMNS}
        FROM videos
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query("SELECT COUNT(*) AS total FROM videos WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_one(pool)
        .await?
        .get::<i64, _>("total");

    Ok((videos, total))
}

pub async fn update_video_details(
    pool: &PgPool,
    video_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET title = COALESCE($1, title),
            description = COALESCE($2, description),
            updated_at = NOW()
        WHERE id = $3
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(title)
    .bind(description)
    .bind(video_id)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

pub async fn update_thumbnail(
    pool: &PgPool,
    video_id: Uuid,
    thumbnail_url: &str,
    thumbnail_key: &str,
) -> Result<Video, sqlx::Error> {
    let video = sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET thumbnail_url = $1, thumbnail_key = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(thumbnail_url)
    .bind(thumbnail_key)
    .bind(video_id)
    .fetch_one(pool)
    .await?;

    Ok(video)
}

pub async fn delete_video(pool: &PgPool, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Flip the publish flag and return the new value.
pub async fn toggle_publish(pool: &PgPool, video_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE videos
        SET is_published = NOT is_published, updated_at = NOW()
        WHERE id = $1
        RETURNING is_published
        "#,
    )
    .bind(video_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("is_published"))
}

pub async fn increment_views(pool: &PgPool, video_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(video_id)
        .execute(pool)
        .await?;

    Ok(())
}
