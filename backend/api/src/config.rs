//! Configuration management
//!
//! Settings are loaded from environment variables, with a `.env` file picked
//! up in development builds. Each section has its own struct with a
//! `from_env()` constructor and sensible defaults for non-secret values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub storage: StorageSettings,
    pub upload: UploadSettings,
    pub cors: CorsSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            server: ServerSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            storage: StorageSettings::from_env()?,
            upload: UploadSettings::from_env()?,
            cors: CorsSettings::from_env(),
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Mark auth cookies `Secure` (behind TLS)
    pub secure_cookies: bool,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
            secure_cookies: env::var("COOKIE_SECURE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
        })
    }
}

/// JWT authentication settings: separate secrets and lifetimes for the
/// access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expiry_secs: i64,
    pub refresh_expiry_secs: i64,
    pub issuer: String,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            access_secret: env::var("JWT_ACCESS_SECRET").context("JWT_ACCESS_SECRET must be set")?,
            refresh_secret: env::var("JWT_REFRESH_SECRET")
                .context("JWT_REFRESH_SECRET must be set")?,
            access_expiry_secs: env::var("JWT_ACCESS_EXPIRY_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .context("Invalid JWT_ACCESS_EXPIRY_SECS")?,
            refresh_expiry_secs: env::var("JWT_REFRESH_EXPIRY_SECS")
                .unwrap_or_else(|_| "864000".to_string())
                .parse()
                .context("Invalid JWT_REFRESH_EXPIRY_SECS")?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "vidtube".to_string()),
        })
    }
}

/// Object storage settings, handed to the media-store lib
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub bucket: String,
    pub region: String,
    pub key_prefix: Option<String>,
    pub public_base_url: Option<String>,
}

impl StorageSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            bucket: env::var("S3_BUCKET").context("S3_BUCKET must be set")?,
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            key_prefix: env::var("S3_KEY_PREFIX").ok(),
            public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
        })
    }

    pub fn to_store_config(&self, staging_dir: &std::path::Path) -> media_store::StoreConfig {
        media_store::StoreConfig {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            key_prefix: self.key_prefix.clone(),
            public_base_url: self.public_base_url.clone(),
            staging_dir: Some(staging_dir.to_path_buf()),
        }
    }
}

/// Multipart upload staging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSettings {
    pub staging_dir: PathBuf,
    pub max_file_bytes: usize,
}

impl UploadSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            staging_dir: env::var("UPLOAD_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./tmp/uploads")),
            max_file_bytes: env::var("UPLOAD_MAX_FILE_BYTES")
                .unwrap_or_else(|_| (512 * 1024 * 1024).to_string())
                .parse()
                .context("Invalid UPLOAD_MAX_FILE_BYTES")?,
        })
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: String,
}

impl CorsSettings {
    fn from_env() -> Self {
        Self {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_settings_from_env() {
        env::set_var("JWT_ACCESS_SECRET", "access-secret");
        env::set_var("JWT_REFRESH_SECRET", "refresh-secret");
        env::set_var("JWT_ACCESS_EXPIRY_SECS", "900");

        let settings = JwtSettings::from_env().unwrap();

        assert_eq!(settings.access_secret, "access-secret");
        assert_eq!(settings.refresh_secret, "refresh-secret");
        assert_eq!(settings.access_expiry_secs, 900);
        assert_eq!(settings.refresh_expiry_secs, 864000); // Default
        assert_eq!(settings.issuer, "vidtube");

        env::remove_var("JWT_ACCESS_SECRET");
        env::remove_var("JWT_REFRESH_SECRET");
        env::remove_var("JWT_ACCESS_EXPIRY_SECS");
    }

    #[test]
    fn server_settings_defaults() {
        let settings = ServerSettings::from_env().unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert!(!settings.secure_cookies);
    }

    #[test]
    fn upload_settings_defaults() {
        let settings = UploadSettings::from_env().unwrap();

        assert_eq!(settings.staging_dir, PathBuf::from("./tmp/uploads"));
        assert_eq!(settings.max_file_bytes, 512 * 1024 * 1024);
    }
}
