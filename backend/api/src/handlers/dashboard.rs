//! Channel dashboard: aggregate stats and a channel's full video list,
//! unpublished videos included.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::models::PageQuery;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats/{channelId}
pub async fn channel_stats(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    db::users::find_user_by_id(&state.db, channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    let stats = db::dashboard::get_channel_stats(&state.db, channel_id).await?;

    Ok(ApiResponse::ok(
        stats,
        "Channel stats fetched successfully",
    ))
}

/// GET /api/v1/dashboard/videos/{channelId}
pub async fn channel_videos(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let channel_id = path.into_inner();

    db::users::find_user_by_id(&state.db, channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    let (videos, total) =
        db::videos::list_videos_by_owner(&state.db, channel_id, query.limit(), query.offset())
            .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({
            "videos": videos,
            "total": total,
            "page": query.page.max(1),
            "limit": query.limit(),
        }),
        "Channel videos fetched successfully",
    ))
}
