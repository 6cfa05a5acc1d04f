use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::ChannelStats;

/// Aggregate totals for a channel in a single round trip.
pub async fn get_channel_stats(pool: &PgPool, channel_id: Uuid) -> Result<ChannelStats, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM videos v WHERE v.owner_id = $1) AS total_videos,
            (SELECT COALESCE(SUM(v.views), 0) FROM videos v WHERE v.owner_id = $1) AS total_views,
            (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = $1) AS total_subscribers,
            (SELECT COUNT(*) FROM likes l
             JOIN videos v ON v.id = l.video_id
             WHERE v.owner_id = $1) AS total_likes
        "#,
    )
    .bind(channel_id)
    .fetch_one(pool)
    .await?;

    Ok(ChannelStats {
        total_videos: row.get("total_videos"),
        total_views: row.get("total_views"),
        total_subscribers: row.get("total_subscribers"),
        total_likes: row.get("total_likes"),
    })
}
