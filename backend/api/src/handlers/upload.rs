//! Multipart staging
//!
//! File fields are streamed to the local staging directory before anything is
//! pushed to object storage; text fields are collected alongside. Callers get
//! back staged paths and hand them to [`media_store::MediaStore::upload_file`],
//! which owns cleanup from there.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// A file field staged on local disk
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub content_type: String,
}

/// Parsed multipart form: text fields by name, staged files by field name
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, StagedFile>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<StagedFile> {
        self.files.remove(name)
    }

    /// Remove every staged file. Called when the request fails before the
    /// files reach object storage.
    pub async fn discard(&mut self) {
        for (_, staged) in self.files.drain() {
            if let Err(err) = tokio::fs::remove_file(&staged.path).await {
                tracing::warn!(
                    path = %staged.path.display(),
                    "failed to remove staged file: {err}"
                );
            }
        }
    }
}

/// Drain a multipart payload, staging file fields under `staging_dir` with
/// uuid names (original extension preserved) and capping each file at
/// `max_bytes`.
pub async fn collect_form(
    mut payload: Multipart,
    staging_dir: &Path,
    max_bytes: usize,
) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let Some(cd) = field.content_disposition() else {
            continue;
        };
        let Some(name) = cd.get_name().map(str::to_string) else {
            continue;
        };

        let filename = cd.get_filename().map(str::to_string);
        match filename {
            Some(filename) => {
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

                let path = staged_path(staging_dir, &filename);
                let result = stream_to_disk(&mut field, &path, max_bytes).await;

                if let Err(err) = result {
                    // The partial file and anything staged earlier are useless now
                    if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                        tracing::debug!(
                            path = %path.display(),
                            "failed to remove partial staged file: {remove_err}"
                        );
                    }
                    form.discard().await;
                    return Err(err);
                }

                form.files.insert(name, StagedFile { path, content_type });
            }
            None => {
                let mut value = Vec::new();
                while let Some(chunk) = field.try_next().await? {
                    value.extend_from_slice(&chunk);
                }
                let text = String::from_utf8(value)
                    .map_err(|_| AppError::BadRequest(format!("Field {name} is not valid UTF-8")))?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

fn staged_path(staging_dir: &Path, original_name: &str) -> PathBuf {
    let id = Uuid::new_v4();
    let name = match Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    };
    staging_dir.join(name)
}

async fn stream_to_disk(
    field: &mut actix_multipart::Field,
    path: &Path,
    max_bytes: usize,
) -> Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0usize;

    while let Some(chunk) = field.try_next().await? {
        written += chunk.len();
        if written > max_bytes {
            return Err(AppError::BadRequest("File exceeds the size limit".to_string()));
        }
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_path_keeps_extension() {
        let path = staged_path(Path::new("/tmp/staging"), "clip.mp4");
        assert!(path.starts_with("/tmp/staging"));
        assert!(path.extension().is_some_and(|ext| ext == "mp4"));
    }

    #[test]
    fn staged_path_without_extension() {
        let path = staged_path(Path::new("/tmp/staging"), "blob");
        assert!(path.extension().is_none());
    }
}
