use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ChannelSubscriber, SubscribedChannel, ToggleOutcome};

/// Toggle a subscription. Same race-safe shape as the like toggle: the
/// unique (subscriber_id, channel_id) constraint absorbs duplicate inserts.
pub async fn toggle_subscription(
    pool: &PgPool,
    subscriber_id: Uuid,
    channel_id: Uuid,
) -> Result<Option<ToggleOutcome>, sqlx::Error> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO subscriptions (subscriber_id, channel_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        return Ok(Some(ToggleOutcome::Created));
    }

    let deleted = sqlx::query(
        r#"
        DELETE FROM subscriptions
        WHERE subscriber_id = $1 AND channel_id = $2
        RETURNING id
        "#,
    )
    .bind(subscriber_id)
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(deleted.map(|_| ToggleOutcome::Removed))
}

/// Users subscribed to a channel, newest first.
pub async fn list_channel_subscribers(
    pool: &PgPool,
    channel_id: Uuid,
) -> Result<Vec<ChannelSubscriber>, sqlx::Error> {
    let subscribers = sqlx::query_as::<_, ChannelSubscriber>(
        r#"
        SELECT s.subscriber_id, u.username, u.fullname, u.avatar_url AS avatar,
               s.created_at AS subscribed_at
        FROM subscriptions s
        JOIN users u ON u.id = s.subscriber_id
        WHERE s.channel_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;

    Ok(subscribers)
}

/// Channels the user follows, newest first.
pub async fn list_subscribed_channels(
    pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Vec<SubscribedChannel>, sqlx::Error> {
    let channels = sqlx::query_as::<_, SubscribedChannel>(
        r#"
        SELECT s.channel_id, u.username, u.fullname, u.avatar_url AS avatar,
               s.created_at AS subscribed_at
        FROM subscriptions s
        JOIN users u ON u.id = s.channel_id
        WHERE s.subscriber_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(subscriber_id)
    .fetch_all(pool)
    .await?;

    Ok(channels)
}
