use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{ChannelProfile, User};

const USER_COLUMNS: &str = "id, username, email, fullname, password_hash, avatar_url, avatar_key, \
     cover_image_url, cover_image_key, refresh_token, created_at, updated_at";

/// Insert a new user. Fails with a unique violation when the username or
/// email is already taken.
#[allow(clippy::too_many_arguments)]
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    fullname: &str,
    password_hash: &str,
    avatar_url: &str,
    avatar_key: &str,
    cover_image_url: Option<&str>,
    cover_image_key: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, email, fullname, password_hash,
                           avatar_url, avatar_key, cover_image_url, cover_image_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(username)
    .bind(email)
    .bind(fullname)
    .bind(password_hash)
    .bind(avatar_url)
    .bind(avatar_key)
    .bind(cover_image_url)
    .bind(cover_image_key)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Look a user up by username or email; either identifier works.
pub async fn find_user_by_identifier(
    pool: &PgPool,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE ($1::text IS NOT NULL AND username = $1)
           OR ($2::text IS NOT NULL AND email = $2)
        LIMIT 1
        "#
    ))
    .bind(username)
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn username_or_email_taken(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2) AS taken",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("taken"))
}

/// Store or clear the refresh token issued to a user.
pub async fn set_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
    refresh_token: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET refresh_token = $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(refresh_token)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_password_hash(
    pool: &PgPool,
    user_id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(password_hash)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update the mutable account fields, keeping current values where a field
/// is not supplied.
pub async fn update_account(
    pool: &PgPool,
    user_id: Uuid,
    fullname: Option<&str>,
    email: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET fullname = COALESCE($1, fullname),
            email = COALESCE($2, email),
            updated_at = NOW()
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(fullname)
    .bind(email)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn update_avatar(
    pool: &PgPool,
    user_id: Uuid,
    avatar_url: &str,
    avatar_key: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET avatar_url = $1, avatar_key = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(avatar_url)
    .bind(avatar_key)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn update_cover_image(
    pool: &PgPool,
    user_id: Uuid,
    cover_image_url: &str,
    cover_image_key: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET cover_image_url = $1, cover_image_key = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(cover_image_url)
    .bind(cover_image_key)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Channel profile: the user joined with subscriber counts and a membership
/// test for the viewer. `viewer_id` is NULL for anonymous requests.
pub async fn get_channel_profile(
    pool: &PgPool,
    username: &str,
    viewer_id: Option<Uuid>,
) -> Result<Option<ChannelProfile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            u.id, u.username, u.fullname, u.email, u.avatar_url, u.cover_image_url,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscribers_count,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id) AS subscribed_to_count,
            EXISTS(
                SELECT 1 FROM subscriptions s
                WHERE s.channel_id = u.id AND s.subscriber_id = $2
            ) AS is_subscribed
        FROM users u
        WHERE u.username = $1
        "#,
    )
    .bind(username)
    .bind(viewer_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| ChannelProfile {
        id: r.get("id"),
        username: r.get("username"),
        fullname: r.get("fullname"),
        email: r.get("email"),
        avatar: r.get("avatar_url"),
        cover_image: r.get("cover_image_url"),
        subscribers_count: r.get("subscribers_count"),
        subscribed_to_count: r.get("subscribed_to_count"),
        is_subscribed: r.get("is_subscribed"),
    }))
}
