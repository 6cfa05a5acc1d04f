use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Comment, CommentWithOwner, OwnerSummary};

fn comment_with_owner(row: &PgRow) -> CommentWithOwner {
    CommentWithOwner {
        comment: Comment {
            id: row.get("id"),
            video_id: row.get("video_id"),
            owner_id: row.get("owner_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        },
        owner: OwnerSummary {
            id: row.get("owner_id"),
            username: row.get("owner_username"),
            fullname: row.get("owner_fullname"),
            avatar: row.get("owner_avatar"),
        },
    }
}

pub async fn create_comment(
    pool: &PgPool,
    video_id: Uuid,
    owner_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (video_id, owner_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, video_id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(video_id)
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

pub async fn find_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, video_id, owner_id, content, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Comments on a video, newest first, with their owner projections.
pub async fn list_comments_for_video(
    pool: &PgPool,
    video_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<(Vec<CommentWithOwner>, i64), sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.video_id, c.owner_id, c.content, c.created_at, c.updated_at,
               u.username AS owner_username, u.fullname AS owner_fullname,
               u.avatar_url AS owner_avatar
        FROM comments c
        JOIN users u ON u.id = c.owner_id
        WHERE c.video_id = $1
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(video_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query("SELECT COUNT(*) AS total FROM comments WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(pool)
        .await?
        .get::<i64, _>("total");

    Ok((rows.iter().map(comment_with_owner).collect(), total))
}

pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING id, video_id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(comment_id)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(())
}
