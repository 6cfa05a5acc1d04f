use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A channel subscriber with its user projection
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSubscriber {
    pub subscriber_id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
    pub subscribed_at: DateTime<Utc>,
}

/// A channel the caller follows, with its user projection
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    pub channel_id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
    pub subscribed_at: DateTime<Utc>,
}
