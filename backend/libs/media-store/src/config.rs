/// Object storage configuration
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub bucket: String,
    pub region: String,
    /// Optional key prefix, e.g. "media"
    pub key_prefix: Option<String>,
    /// CDN or public base URL; falls back to the virtual-hosted S3 URL
    pub public_base_url: Option<String>,
    /// Shared staging directory swept on upload failure
    pub staging_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Public URL for a stored key
    pub fn public_url(&self, key: &str) -> String {
        match self.public_base_url.as_deref() {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base: Option<&str>) -> StoreConfig {
        StoreConfig {
            bucket: "vidtube-media".to_string(),
            region: "eu-west-1".to_string(),
            key_prefix: None,
            public_base_url: base.map(|b| b.to_string()),
            staging_dir: None,
        }
    }

    #[test]
    fn public_url_uses_cdn_base() {
        let config = config_with_base(Some("https://cdn.vidtube.dev/"));
        assert_eq!(
            config.public_url("media/abc.mp4"),
            "https://cdn.vidtube.dev/media/abc.mp4"
        );
    }

    #[test]
    fn public_url_falls_back_to_s3() {
        let config = config_with_base(None);
        assert_eq!(
            config.public_url("media/abc.mp4"),
            "https://vidtube-media.s3.eu-west-1.amazonaws.com/media/abc.mp4"
        );
    }
}
