//! User account handlers: registration, session lifecycle, profile updates,
//! channel profiles, and watch history.

use actix_multipart::Multipart;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::upload::{collect_form, StagedFile};
use crate::middleware::UserId;
use crate::models::{
    ChangePasswordRequest, LoginRequest, PageQuery, RefreshTokenRequest, RegisterInput,
    UpdateAccountRequest, UserResponse,
};
use crate::response::ApiResponse;
use crate::security::{jwt, password};
use crate::state::AppState;

const ACCESS_COOKIE: &str = "accessToken";
const REFRESH_COOKIE: &str = "refreshToken";

fn auth_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name.to_string(), value.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

fn expired_cookie(name: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(name.to_string(), String::new())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// POST /api/v1/users/register
///
/// Multipart form: fullname, email, username, password, avatar file
/// (required), coverImage file (optional). Uploads that succeeded before a
/// later step fails are deleted again.
pub async fn register(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse> {
    let mut form = collect_form(
        payload,
        &state.settings.upload.staging_dir,
        state.settings.upload.max_file_bytes,
    )
    .await?;

    let input = RegisterInput {
        fullname: form.text("fullname").unwrap_or_default().trim().to_string(),
        email: form.text("email").unwrap_or_default().trim().to_string(),
        username: form
            .text("username")
            .unwrap_or_default()
            .trim()
            .to_lowercase(),
        password: form.text("password").unwrap_or_default().to_string(),
    };

    if input.fullname.is_empty()
        || input.email.is_empty()
        || input.username.is_empty()
        || input.password.is_empty()
    {
        form.discard().await;
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if let Err(err) = input.validate() {
        form.discard().await;
        return Err(err.into());
    }

    if db::users::username_or_email_taken(&state.db, &input.username, &input.email).await? {
        form.discard().await;
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let Some(avatar_file) = form.take_file("avatar") else {
        form.discard().await;
        return Err(AppError::BadRequest("Avatar file is missing".to_string()));
    };
    let cover_file = form.take_file("coverImage");

    let avatar = upload_staged(&state, avatar_file).await?;

    let cover = match cover_file {
        Some(file) => match upload_staged(&state, file).await {
            Ok(stored) => Some(stored),
            Err(err) => {
                state.media.delete_object(&avatar.key).await;
                return Err(err);
            }
        },
        None => None,
    };

    let password_hash = password::hash_password(&input.password)?;

    let created = db::users::create_user(
        &state.db,
        &input.username,
        &input.email,
        &input.fullname,
        &password_hash,
        &avatar.url,
        &avatar.key,
        cover.as_ref().map(|c| c.url.as_str()),
        cover.as_ref().map(|c| c.key.as_str()),
    )
    .await;

    let user = match created {
        Ok(user) => user,
        Err(err) => {
            state.media.delete_object(&avatar.key).await;
            if let Some(cover) = &cover {
                state.media.delete_object(&cover.key).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(ApiResponse::created(
        UserResponse::from(user),
        "User registered successfully",
    ))
}

async fn upload_staged(
    state: &AppState,
    file: StagedFile,
) -> Result<media_store::StoredObject> {
    let stored = state
        .media
        .upload_file(&file.path, &file.content_type)
        .await?;
    Ok(stored)
}

/// POST /api/v1/users/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    if body.email.is_none() && body.username.is_none() {
        return Err(AppError::BadRequest(
            "Username or email is required".to_string(),
        ));
    }

    let user = db::users::find_user_by_identifier(
        &state.db,
        body.username.as_deref(),
        body.email.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let pair = jwt::generate_token_pair(&state.settings.jwt, user.id, &user.username)?;
    db::users::set_refresh_token(&state.db, user.id, Some(&pair.refresh_token)).await?;

    let secure = state.settings.server.secure_cookies;
    let jwt = &state.settings.jwt;

    tracing::info!(user_id = %user.id, "user logged in");

    let envelope = ApiResponse::new(
        StatusCode::OK,
        serde_json::json!({
            "user": UserResponse::from(user),
            "accessToken": pair.access_token,
            "refreshToken": pair.refresh_token,
        }),
        "User logged in successfully",
    );

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(
            ACCESS_COOKIE,
            &pair.access_token,
            jwt.access_expiry_secs,
            secure,
        ))
        .cookie(auth_cookie(
            REFRESH_COOKIE,
            &pair.refresh_token,
            jwt.refresh_expiry_secs,
            secure,
        ))
        .json(envelope))
}

/// POST /api/v1/users/logout
pub async fn logout(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    db::users::set_refresh_token(&state.db, user_id.0, None).await?;

    let secure = state.settings.server.secure_cookies;
    let envelope = ApiResponse::new(
        StatusCode::OK,
        serde_json::json!({}),
        "User logged out successfully",
    );

    Ok(HttpResponse::Ok()
        .cookie(expired_cookie(ACCESS_COOKIE, secure))
        .cookie(expired_cookie(REFRESH_COOKIE, secure))
        .json(envelope))
}

/// POST /api/v1/users/refresh-token
///
/// Rotation: the presented refresh token must match the one stored on the
/// user row; both tokens are replaced on success.
pub async fn refresh_token(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse> {
    let presented = body
        .and_then(|b| b.into_inner().refresh_token)
        .or_else(|| req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::Unauthorized("Refresh token is missing".to_string()))?;

    let claims = jwt::validate_refresh_token(&state.settings.jwt, &presented)?;
    let user_id = jwt::user_id_from_claims(&claims)?;

    let user = db::users::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    if user.refresh_token.as_deref() != Some(presented.as_str()) {
        return Err(AppError::Unauthorized(
            "Refresh token is expired or used".to_string(),
        ));
    }

    let pair = jwt::generate_token_pair(&state.settings.jwt, user.id, &user.username)?;
    db::users::set_refresh_token(&state.db, user.id, Some(&pair.refresh_token)).await?;

    let secure = state.settings.server.secure_cookies;
    let jwt_settings = &state.settings.jwt;

    let envelope = ApiResponse::new(
        StatusCode::OK,
        serde_json::json!({
            "accessToken": pair.access_token,
            "refreshToken": pair.refresh_token,
        }),
        "Access token refreshed",
    );

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(
            ACCESS_COOKIE,
            &pair.access_token,
            jwt_settings.access_expiry_secs,
            secure,
        ))
        .cookie(auth_cookie(
            REFRESH_COOKIE,
            &pair.refresh_token,
            jwt_settings.refresh_expiry_secs,
            secure,
        ))
        .json(envelope))
}

/// POST /api/v1/users/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    if body.new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "New password must be at least 6 characters".to_string(),
        ));
    }

    let user = db::users::find_user_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify_password(&body.old_password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid old password".to_string()));
    }

    let new_hash = password::hash_password(&body.new_password)?;
    db::users::update_password_hash(&state.db, user.id, &new_hash).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// GET /api/v1/users/current-user
pub async fn current_user(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = db::users::find_user_by_id(&state.db, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(
        UserResponse::from(user),
        "Current user fetched successfully",
    ))
}

/// PATCH /api/v1/users/update-account
pub async fn update_account(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse> {
    let fullname = body.fullname.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = body.email.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if fullname.is_none() && email.is_none() {
        return Err(AppError::BadRequest(
            "At least one field is required".to_string(),
        ));
    }

    if let Some(email) = email {
        if !crate::validators::validate_email(email) {
            return Err(AppError::BadRequest("Invalid email format".to_string()));
        }
    }

    let user = db::users::update_account(&state.db, user_id.0, fullname, email).await?;

    Ok(ApiResponse::ok(
        UserResponse::from(user),
        "Account details updated successfully",
    ))
}

/// PATCH /api/v1/users/avatar
pub async fn update_avatar(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let stored = stage_and_upload_single(&state, payload, "avatar", "Avatar file is missing").await?;

    let previous = db::users::find_user_by_id(&state.db, user_id.0)
        .await?
        .map(|u| u.avatar_key);

    let user = match db::users::update_avatar(&state.db, user_id.0, &stored.url, &stored.key).await
    {
        Ok(user) => user,
        Err(err) => {
            state.media.delete_object(&stored.key).await;
            return Err(err.into());
        }
    };

    if let Some(old_key) = previous.filter(|k| !k.is_empty()) {
        state.media.delete_object(&old_key).await;
    }

    Ok(ApiResponse::ok(
        UserResponse::from(user),
        "Avatar updated successfully",
    ))
}

/// PATCH /api/v1/users/cover-image
pub async fn update_cover_image(
    state: web::Data<AppState>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let stored =
        stage_and_upload_single(&state, payload, "coverImage", "Cover image file is missing")
            .await?;

    let previous = db::users::find_user_by_id(&state.db, user_id.0)
        .await?
        .and_then(|u| u.cover_image_key);

    let user =
        match db::users::update_cover_image(&state.db, user_id.0, &stored.url, &stored.key).await {
            Ok(user) => user,
            Err(err) => {
                state.media.delete_object(&stored.key).await;
                return Err(err.into());
            }
        };

    if let Some(old_key) = previous.filter(|k| !k.is_empty()) {
        state.media.delete_object(&old_key).await;
    }

    Ok(ApiResponse::ok(
        UserResponse::from(user),
        "Cover image updated successfully",
    ))
}

async fn stage_and_upload_single(
    state: &AppState,
    payload: Multipart,
    field: &str,
    missing_message: &str,
) -> Result<media_store::StoredObject> {
    let mut form = collect_form(
        payload,
        &state.settings.upload.staging_dir,
        state.settings.upload.max_file_bytes,
    )
    .await?;

    let Some(file) = form.take_file(field) else {
        form.discard().await;
        return Err(AppError::BadRequest(missing_message.to_string()));
    };
    form.discard().await;

    upload_staged(state, file).await
}

/// GET /api/v1/users/c/{username}
pub async fn channel_profile(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner().trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }

    let profile = db::users::get_channel_profile(&state.db, &username, Some(user_id.0))
        .await?
        .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))?;

    Ok(ApiResponse::ok(
        profile,
        "Channel profile fetched successfully",
    ))
}

/// GET /api/v1/users/history
pub async fn watch_history(
    state: web::Data<AppState>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let history =
        db::watch_history::list_watch_history(&state.db, user_id.0, query.limit(), query.offset())
            .await?;

    Ok(ApiResponse::ok(
        history,
        "Watch history fetched successfully",
    ))
}
