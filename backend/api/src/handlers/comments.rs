//! Comment handlers. Updates and deletes distinguish a missing comment (404)
//! from someone else's comment (403).

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{Comment, CreateCommentRequest, PageQuery, UpdateCommentRequest};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validators::require_non_blank;

/// GET /api/v1/comments/{videoId}
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    db::videos::find_video_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let (comments, total) =
        db::comments::list_comments_for_video(&state.db, video_id, query.limit(), query.offset())
            .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({
            "comments": comments,
            "total": total,
            "page": query.page.max(1),
            "limit": query.limit(),
        }),
        "Comments fetched successfully",
    ))
}

/// POST /api/v1/comments/{videoId}
pub async fn add_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let content = require_non_blank(&body.content, "Content")?;

    db::videos::find_video_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let comment = db::comments::create_comment(&state.db, video_id, user_id.0, content).await?;

    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// PATCH /api/v1/comments/c/{commentId}
pub async fn update_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();
    let content = require_non_blank(&body.content, "Content")?;

    owned_comment(&state, comment_id, user_id.0, "update").await?;

    let comment = db::comments::update_comment(&state.db, comment_id, content).await?;

    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

/// DELETE /api/v1/comments/c/{commentId}
pub async fn delete_comment(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comment_id = path.into_inner();

    owned_comment(&state, comment_id, user_id.0, "delete").await?;

    db::comments::delete_comment(&state.db, comment_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Comment deleted successfully",
    ))
}

async fn owned_comment(
    state: &AppState,
    comment_id: Uuid,
    user_id: Uuid,
    action: &str,
) -> Result<Comment> {
    let comment = db::comments::find_comment_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.owner_id != user_id {
        return Err(AppError::Forbidden(format!(
            "You can only {} your own comments",
            action
        )));
    }

    Ok(comment)
}
