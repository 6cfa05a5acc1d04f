//! Like toggles for videos, comments, and tweets, plus the liked-videos
//! listing. Toggles are backed by partial unique indexes, so two racing
//! requests resolve to one like instead of two.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db;
use crate::db::likes::LikeTarget;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::PageQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/likes/toggle/v/{videoId}
pub async fn toggle_video_like(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    db::videos::find_video_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    toggle(&state, user_id.0, LikeTarget::Video, video_id).await
}

/// POST /api/v1/likes/toggle/c/{commentId}
pub async fn toggle_comment_like(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();

    db::comments::find_comment_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    toggle(&state, user_id.0, LikeTarget::Comment, comment_id).await
}

/// POST /api/v1/likes/toggle/t/{tweetId}
pub async fn toggle_tweet_like(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();

    db::tweets::find_tweet_by_id(&state.db, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    toggle(&state, user_id.0, LikeTarget::Tweet, tweet_id).await
}

async fn toggle(
    state: &AppState,
    user_id: Uuid,
    target: LikeTarget,
    target_id: Uuid,
) -> Result<HttpResponse> {
    let outcome = db::likes::toggle_like(&state.db, user_id, target, target_id)
        .await?
        .ok_or_else(|| AppError::Conflict("Toggle conflicted, please retry".to_string()))?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "liked": matches!(outcome, crate::models::ToggleOutcome::Created) }),
        outcome.like_message(),
    ))
}

/// GET /api/v1/likes/videos
pub async fn liked_videos(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let videos =
        db::likes::list_liked_videos(&state.db, user_id.0, query.limit(), query.offset()).await?;

    Ok(ApiResponse::ok(
        videos,
        "Liked videos fetched successfully",
    ))
}
