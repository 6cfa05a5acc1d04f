/// Shared object-storage adapter for media uploads
///
/// Moves locally staged upload files into S3 and hands back the stored key
/// plus a public URL. Handlers stage multipart files on disk first, then call
/// [`MediaStore::upload_file`]; the staged copy is removed on success and
/// cleaned up best-effort on failure.
use std::path::Path;
use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

pub mod config;

pub use config::StoreConfig;

/// Errors surfaced by the media store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("staged file not found: {0}")]
    MissingFile(String),

    #[error("failed to read staged file: {0}")]
    Io(#[from] std::io::Error),

    #[error("object storage upload failed: {0}")]
    Upload(String),
}

/// A successfully stored object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[derive(Clone)]
pub struct MediaStore {
    client: Arc<Client>,
    config: StoreConfig,
}

impl MediaStore {
    /// Create a store with credentials resolved from the environment
    pub async fn connect(config: StoreConfig) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()))
            .load()
            .await;

        Self {
            client: Arc::new(Client::new(&aws_config)),
            config,
        }
    }

    /// Create a store around an existing client
    pub fn with_client(client: Arc<Client>, config: StoreConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Upload a locally staged file and remove the staged copy on success.
    ///
    /// On failure the staged file and any leftovers in the shared staging
    /// directory are cleaned up best-effort before the error is returned.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        content_type: &str,
    ) -> Result<StoredObject, StoreError> {
        if !local_path.exists() {
            return Err(StoreError::MissingFile(local_path.display().to_string()));
        }

        let key = self.object_key(local_path);

        let body = match ByteStream::from_path(local_path).await {
            Ok(body) => body,
            Err(err) => {
                self.cleanup_staging(local_path).await;
                return Err(StoreError::Upload(format!(
                    "failed to read {}: {err}",
                    local_path.display()
                )));
            }
        };

        let result = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type)
            .body(body)
            .send()
            .await;

        match result {
            Ok(_) => {
                if let Err(err) = tokio::fs::remove_file(local_path).await {
                    tracing::warn!(
                        path = %local_path.display(),
                        "failed to remove staged file after upload: {err}"
                    );
                }
                let url = self.config.public_url(&key);
                tracing::info!(%key, "uploaded media object");
                Ok(StoredObject { key, url })
            }
            Err(err) => {
                tracing::error!(%key, "media upload failed: {err}");
                self.cleanup_staging(local_path).await;
                Err(StoreError::Upload(err.to_string()))
            }
        }
    }

    /// Delete a stored object. Fire-and-forget: failures are logged only.
    pub async fn delete_object(&self, key: &str) {
        let result = self
            .client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => tracing::info!(%key, "deleted media object"),
            Err(err) => tracing::warn!(%key, "failed to delete media object: {err}"),
        }
    }

    /// Verify the bucket is reachable. Called once at startup.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|err| StoreError::Upload(err.to_string()))?;

        Ok(())
    }

    /// Uuid-keyed object name, preserving the staged file's extension.
    fn object_key(&self, local_path: &Path) -> String {
        let id = uuid::Uuid::new_v4();
        let name = match local_path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        };

        match self.config.key_prefix.as_deref() {
            Some(prefix) => format!("{}/{}", prefix.trim_matches('/'), name),
            None => name,
        }
    }

    /// Remove the failed staged file plus anything else left in the shared
    /// staging directory. Errors here are swallowed; the upload error is the
    /// one the caller needs to see.
    async fn cleanup_staging(&self, local_path: &Path) {
        if local_path.exists() {
            if let Err(err) = tokio::fs::remove_file(local_path).await {
                tracing::warn!(
                    path = %local_path.display(),
                    "failed to remove staged file: {err}"
                );
            }
        }

        let Some(staging_dir) = self.config.staging_dir.as_ref() else {
            return;
        };

        let Ok(mut entries) = tokio::fs::read_dir(staging_dir).await else {
            return;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_file() {
                if let Err(err) = tokio::fs::remove_file(&path).await {
                    tracing::debug!(path = %path.display(), "staging sweep skipped file: {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_store(config: StoreConfig) -> MediaStore {
        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        MediaStore::with_client(Arc::new(Client::from_conf(sdk_config)), config)
    }

    fn base_config() -> StoreConfig {
        StoreConfig {
            bucket: "vidtube-media".to_string(),
            region: "us-east-1".to_string(),
            key_prefix: Some("media".to_string()),
            public_base_url: None,
            staging_dir: None,
        }
    }

    #[test]
    fn object_key_keeps_extension_and_prefix() {
        let store = test_store(base_config());
        let key = store.object_key(&PathBuf::from("/tmp/staged/clip.mp4"));

        assert!(key.starts_with("media/"));
        assert!(key.ends_with(".mp4"));
    }

    #[test]
    fn object_key_without_extension() {
        let store = test_store(base_config());
        let key = store.object_key(&PathBuf::from("/tmp/staged/blob"));

        assert!(key.starts_with("media/"));
        assert!(!key.contains('.'));
    }

    #[tokio::test]
    async fn upload_missing_file_is_rejected() {
        let store = test_store(base_config());
        let result = store
            .upload_file(&PathBuf::from("/nonexistent/file.png"), "image/png")
            .await;

        assert!(matches!(result, Err(StoreError::MissingFile(_))));
    }

    #[tokio::test]
    async fn cleanup_sweeps_staging_dir() {
        let staging = tempfile::tempdir().expect("tempdir");
        let staged = staging.path().join("upload.bin");
        let leftover = staging.path().join("leftover.bin");
        std::fs::write(&staged, b"data").expect("write staged");
        std::fs::write(&leftover, b"data").expect("write leftover");

        let mut config = base_config();
        config.staging_dir = Some(staging.path().to_path_buf());
        let store = test_store(config);

        store.cleanup_staging(&staged).await;

        assert!(!staged.exists());
        assert!(!leftover.exists());
    }
}
