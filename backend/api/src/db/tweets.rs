use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Tweet;

pub async fn create_tweet(
    pool: &PgPool,
    owner_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        INSERT INTO tweets (owner_id, content)
        VALUES ($1, $2)
        RETURNING id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(owner_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

pub async fn find_tweet_by_id(pool: &PgPool, tweet_id: Uuid) -> Result<Option<Tweet>, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        SELECT id, owner_id, content, created_at, updated_at
        FROM tweets
        WHERE id = $1
        "#,
    )
    .bind(tweet_id)
    .fetch_optional(pool)
    .await?;

    Ok(tweet)
}

pub async fn list_tweets_by_user(
    pool: &PgPool,
    owner_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Tweet>, sqlx::Error> {
    let tweets = sqlx::query_as::<_, Tweet>(
        r#"
        SELECT id, owner_id, content, created_at, updated_at
        FROM tweets
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(tweets)
}

pub async fn update_tweet(
    pool: &PgPool,
    tweet_id: Uuid,
    content: &str,
) -> Result<Tweet, sqlx::Error> {
    let tweet = sqlx::query_as::<_, Tweet>(
        r#"
        UPDATE tweets
        SET content = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING id, owner_id, content, created_at, updated_at
        "#,
    )
    .bind(content)
    .bind(tweet_id)
    .fetch_one(pool)
    .await?;

    Ok(tweet)
}

pub async fn delete_tweet(pool: &PgPool, tweet_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tweets WHERE id = $1")
        .bind(tweet_id)
        .execute(pool)
        .await?;

    Ok(())
}
