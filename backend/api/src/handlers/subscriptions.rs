//! Subscription handlers. Self-subscription is rejected in the handler and
//! again by a database CHECK constraint.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/subscriptions/c/{channelId}
pub async fn toggle_subscription(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    if channel_id == user_id.0 {
        return Err(AppError::BadRequest(
            "You cannot subscribe to yourself".to_string(),
        ));
    }

    db::users::find_user_by_id(&state.db, channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    let outcome = db::subscriptions::toggle_subscription(&state.db, user_id.0, channel_id)
        .await?
        .ok_or_else(|| AppError::Conflict("Toggle conflicted, please retry".to_string()))?;

    Ok(ApiResponse::ok(
        serde_json::json!({
            "subscribed": matches!(outcome, crate::models::ToggleOutcome::Created)
        }),
        outcome.subscription_message(),
    ))
}

/// GET /api/v1/subscriptions/c
///
/// Channels the authenticated caller is subscribed to.
pub async fn subscribed_channels(
    state: web::Data<AppState>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let channels = db::subscriptions::list_subscribed_channels(&state.db, user_id.0).await?;

    Ok(ApiResponse::ok(
        channels,
        "Subscribed channels fetched successfully",
    ))
}

/// GET /api/v1/subscriptions/u/{channelId}
///
/// Subscribers of a channel.
pub async fn channel_subscribers(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    db::users::find_user_by_id(&state.db, channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    let subscribers = db::subscriptions::list_channel_subscribers(&state.db, channel_id).await?;

    Ok(ApiResponse::ok(
        subscribers,
        "Subscribers fetched successfully",
    ))
}
