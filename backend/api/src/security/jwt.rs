/// JWT issuance and validation
///
/// Access and refresh tokens are signed with separate HS256 secrets and carry
/// a `token_type` claim so one can never stand in for the other. The refresh
/// token value is also persisted on the user row; rotation checks the
/// presented token against the stored one.
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::{AppError, Result};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub token_type: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issue a fresh access + refresh pair for a user
pub fn generate_token_pair(
    settings: &JwtSettings,
    user_id: Uuid,
    username: &str,
) -> Result<TokenPair> {
    let access_token = sign_token(
        settings,
        user_id,
        username,
        TOKEN_TYPE_ACCESS,
        settings.access_expiry_secs,
        &settings.access_secret,
    )?;
    let refresh_token = sign_token(
        settings,
        user_id,
        username,
        TOKEN_TYPE_REFRESH,
        settings.refresh_expiry_secs,
        &settings.refresh_secret,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn sign_token(
    settings: &JwtSettings,
    user_id: Uuid,
    username: &str,
    token_type: &str,
    expiry_secs: i64,
    secret: &str,
) -> Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        token_type: token_type.to_string(),
        iss: settings.issuer.clone(),
        iat: now,
        exp: now + expiry_secs,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate an access token and return its claims
pub fn validate_access_token(settings: &JwtSettings, token: &str) -> Result<Claims> {
    let claims = validate_token(settings, token, &settings.access_secret)?;
    if claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    }
    Ok(claims)
}

/// Validate a refresh token and return its claims
pub fn validate_refresh_token(settings: &JwtSettings, token: &str) -> Result<Claims> {
    let claims = validate_token(settings, token, &settings.refresh_secret)?;
    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
    }
    Ok(claims)
}

fn validate_token(settings: &JwtSettings, token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.set_issuer(&[settings.issuer.as_str()]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

/// Parse the user id out of validated claims
pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_expiry_secs: 900,
            refresh_expiry_secs: 86400,
            issuer: "vidtube".to_string(),
        }
    }

    #[test]
    fn token_pair_round_trip() {
        let settings = test_settings();
        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(&settings, user_id, "ada").expect("generate");

        let access = validate_access_token(&settings, &pair.access_token).expect("access valid");
        assert_eq!(access.username, "ada");
        assert_eq!(user_id_from_claims(&access).unwrap(), user_id);

        let refresh = validate_refresh_token(&settings, &pair.refresh_token).expect("refresh valid");
        assert_eq!(refresh.token_type, TOKEN_TYPE_REFRESH);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let settings = test_settings();
        let pair = generate_token_pair(&settings, Uuid::new_v4(), "ada").expect("generate");

        assert!(validate_access_token(&settings, &pair.refresh_token).is_err());
        assert!(validate_refresh_token(&settings, &pair.access_token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut settings = test_settings();
        settings.access_expiry_secs = -120;
        let pair = generate_token_pair(&settings, Uuid::new_v4(), "ada").expect("generate");

        let err = validate_access_token(&settings, &pair.access_token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let settings = test_settings();
        let pair = generate_token_pair(&settings, Uuid::new_v4(), "ada").expect("generate");

        let mut other = test_settings();
        other.issuer = "someone-else".to_string();
        assert!(validate_access_token(&other, &pair.access_token).is_err());
    }
}
