use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// User entity. The password hash and stored refresh token never leave the
/// service; public responses go through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub avatar_key: String,
    pub cover_image_url: Option<String>,
    pub cover_image_key: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            fullname: user.fullname,
            avatar: user.avatar_url,
            cover_image: user.cover_image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Channel profile aggregate: a user joined with subscription counts and a
/// membership test for the requesting user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub subscribers_count: i64,
    pub subscribed_to_count: i64,
    pub is_subscribed: bool,
}

/// Registration fields carried in the multipart form
#[derive(Debug, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100))]
    pub fullname: String,
    #[validate(email)]
    pub email: String,
    #[validate(
        length(min = 3, max = 32),
        custom(function = "crate::validators::validate_username_shape")
    )]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Login accepts either identifier; at least one must be present
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_drops_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            fullname: "Ada Lovelace".to_string(),
            password_hash: "$argon2id$...".to_string(),
            avatar_url: "https://cdn.vidtube.dev/a.png".to_string(),
            avatar_key: "media/a.png".to_string(),
            cover_image_url: None,
            cover_image_key: None,
            refresh_token: Some("secret".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(UserResponse::from(user)).expect("serialize");
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("refreshToken").is_none());
        assert_eq!(value["username"], "ada");
        assert_eq!(value["coverImage"], serde_json::Value::Null);
    }

    #[test]
    fn register_input_validation() {
        let valid = RegisterInput {
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada_l".to_string(),
            password: "s3cret-pass".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterInput {
            email: "not-an-email".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_email.validate().is_err());

        let short_username = RegisterInput {
            username: "ab".to_string(),
            ..valid_clone(&valid)
        };
        assert!(short_username.validate().is_err());
    }

    fn valid_clone(input: &RegisterInput) -> RegisterInput {
        RegisterInput {
            fullname: input.fullname.clone(),
            email: input.email.clone(),
            username: input.username.clone(),
            password: input.password.clone(),
        }
    }
}
