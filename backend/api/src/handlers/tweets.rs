//! Tweet handlers: short text posts attached to a channel.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{CreateTweetRequest, PageQuery, Tweet, UpdateTweetRequest};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validators::require_non_blank;

/// POST /api/v1/tweets
pub async fn create_tweet(
    state: web::Data<AppState>,
    user_id: UserId,
    body: web::Json<CreateTweetRequest>,
) -> Result<HttpResponse> {
    let content = require_non_blank(&body.content, "Content")?;

    let tweet = db::tweets::create_tweet(&state.db, user_id.0, content).await?;

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// GET /api/v1/tweets/user/{userId}
pub async fn user_tweets(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let owner_id = path.into_inner();

    db::users::find_user_by_id(&state.db, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let tweets =
        db::tweets::list_tweets_by_user(&state.db, owner_id, query.limit(), query.offset()).await?;

    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

/// PATCH /api/v1/tweets/{tweetId}
pub async fn update_tweet(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTweetRequest>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();
    let content = require_non_blank(&body.content, "Content")?;

    owned_tweet(&state, tweet_id, user_id.0, "update").await?;

    let tweet = db::tweets::update_tweet(&state.db, tweet_id, content).await?;

    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

/// DELETE /api/v1/tweets/{tweetId}
pub async fn delete_tweet(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let tweet_id = path.into_inner();

    owned_tweet(&state, tweet_id, user_id.0, "delete").await?;

    db::tweets::delete_tweet(&state.db, tweet_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Tweet deleted successfully",
    ))
}

async fn owned_tweet(
    state: &AppState,
    tweet_id: Uuid,
    user_id: Uuid,
    action: &str,
) -> Result<Tweet> {
    let tweet = db::tweets::find_tweet_by_id(&state.db, tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    if tweet.owner_id != user_id {
        return Err(AppError::Forbidden(format!(
            "You can only {} your own tweets",
            action
        )));
    }

    Ok(tweet)
}
