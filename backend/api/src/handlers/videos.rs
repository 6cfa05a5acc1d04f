//! Video handlers: publish, fetch, list, update, delete, publish toggle.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::upload::collect_form;
use crate::middleware::UserId;
use crate::models::{Video, VideoListQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/videos
pub async fn list_videos(
    state: web::Data<AppState>,
    query: web::Query<VideoListQuery>,
) -> Result<HttpResponse> {
    let (videos, total) = db::videos::list_videos(&state.db, &query).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({
            "videos": videos,
            "total": total,
            "page": query.page.max(1),
            "limit": query.limit(),
        }),
        "Videos fetched successfully",
    ))
}

/// POST /api/v1/videos
///
/// Multipart form: title, description, duration (seconds), videoFile and
/// thumbnail files. The thumbnail upload failing rolls back the video upload.
pub async fn publish_video(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let mut form = collect_form(
        payload,
        &state.settings.upload.staging_dir,
        state.settings.upload.max_file_bytes,
    )
    .await?;

    let title = form.text("title").unwrap_or_default().trim().to_string();
    let description = form
        .text("description")
        .unwrap_or_default()
        .trim()
        .to_string();

    if title.is_empty() || description.is_empty() {
        form.discard().await;
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let duration_secs = match form.text("duration").unwrap_or("0").trim().parse::<i32>() {
        Ok(d) if d >= 0 => d,
        _ => {
            form.discard().await;
            return Err(AppError::BadRequest("Invalid duration".to_string()));
        }
    };

    let Some(video_file) = form.take_file("videoFile") else {
        form.discard().await;
        return Err(AppError::BadRequest("Video file is missing".to_string()));
    };
    let Some(thumbnail_file) = form.take_file("thumbnail") else {
        form.discard().await;
        return Err(AppError::BadRequest(
            "Thumbnail file is missing".to_string(),
        ));
    };

    let video_object = state
        .media
        .upload_file(&video_file.path, &video_file.content_type)
        .await?;

    let thumbnail_object = match state
        .media
        .upload_file(&thumbnail_file.path, &thumbnail_file.content_type)
        .await
    {
        Ok(stored) => stored,
        Err(err) => {
            state.media.delete_object(&video_object.key).await;
            return Err(err.into());
        }
    };

    let created = db::videos::create_video(
        &state.db,
        user_id.0,
        &title,
        &description,
        &video_object.url,
        &video_object.key,
        &thumbnail_object.url,
        &thumbnail_object.key,
        duration_secs,
    )
    .await;

    let video = match created {
        Ok(video) => video,
        Err(err) => {
            state.media.delete_object(&video_object.key).await;
            state.media.delete_object(&thumbnail_object.key).await;
            return Err(err.into());
        }
    };

    tracing::info!(video_id = %video.id, owner_id = %user_id.0, "video published");

    Ok(ApiResponse::created(video, "Video published successfully"))
}

/// GET /api/v1/videos/{videoId}
///
/// Unpublished videos are visible to their owner only; everyone else gets a
/// 404 rather than a hint that the video exists. Fetching also counts a view
/// and records the watch.
pub async fn get_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();

    let mut found = db::videos::find_video_with_owner(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !found.video.is_published && found.video.owner_id != user_id.0 {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    db::videos::increment_views(&state.db, video_id).await?;
    found.video.views += 1;

    db::watch_history::record_watch(&state.db, user_id.0, video_id).await?;

    Ok(ApiResponse::ok(found, "Video fetched successfully"))
}

/// PATCH /api/v1/videos/{videoId}
///
/// Multipart form: optional title and description text fields plus an
/// optional replacement thumbnail. At least one of the three must be
/// present; a replaced thumbnail's old object is deleted after the row
/// points at the new one.
pub async fn update_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let existing = owned_video(&state, video_id, user_id.0).await?;

    let mut form = collect_form(
        payload,
        &state.settings.upload.staging_dir,
        state.settings.upload.max_file_bytes,
    )
    .await?;

    let title = form
        .text("title")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let description = form
        .text("description")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let thumbnail_file = form.take_file("thumbnail");
    form.discard().await;

    if title.is_none() && description.is_none() && thumbnail_file.is_none() {
        return Err(AppError::BadRequest(
            "At least one field is required".to_string(),
        ));
    }

    let mut video = if title.is_some() || description.is_some() {
        db::videos::update_video_details(
            &state.db,
            video_id,
            title.as_deref(),
            description.as_deref(),
        )
        .await?
    } else {
        existing.clone()
    };

    if let Some(file) = thumbnail_file {
        let stored = state
            .media
            .upload_file(&file.path, &file.content_type)
            .await?;

        video = match db::videos::update_thumbnail(&state.db, video_id, &stored.url, &stored.key)
            .await
        {
            Ok(video) => video,
            Err(err) => {
                state.media.delete_object(&stored.key).await;
                return Err(err.into());
            }
        };

        state.media.delete_object(&existing.thumbnail_key).await;
    }

    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

/// DELETE /api/v1/videos/{videoId}
pub async fn delete_video(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let video = owned_video(&state, video_id, user_id.0).await?;

    db::videos::delete_video(&state.db, video_id).await?;

    // Stored media is removed after the row; failures here are logged only
    state.media.delete_object(&video.video_key).await;
    state.media.delete_object(&video.thumbnail_key).await;

    tracing::info!(%video_id, "video deleted");

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Video deleted successfully",
    ))
}

/// PATCH /api/v1/videos/toggle/publish/{videoId}
pub async fn toggle_publish(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    owned_video(&state, video_id, user_id.0).await?;

    let is_published = db::videos::toggle_publish(&state.db, video_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "isPublished": is_published }),
        if is_published {
            "Video published"
        } else {
            "Video unpublished"
        },
    ))
}

/// 404 before 403: a missing video and someone else's video are reported
/// differently.
async fn owned_video(state: &AppState, video_id: Uuid, user_id: Uuid) -> Result<Video> {
    let video = db::videos::find_video_by_id(&state.db, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.owner_id != user_id {
        return Err(AppError::Forbidden(
            "You can only modify your own videos".to_string(),
        ));
    }

    Ok(video)
}
