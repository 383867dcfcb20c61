/**
 * Media Store
 *
 * Uploaded files are either relayed to an external object store or written
 * to the local uploads directory. Either way the caller gets back the URL to
 * persist on the record.
 *
 * - **Remote** - multipart POST (`file`, `folder`, optional `upload_preset`);
 *   the `secure_url` of the JSON response is used
 * - **Local** - `<uploads_dir>/<uuid>.<ext>`, served as `/uploads/<uuid>.<ext>`
 *
 * Handlers upload only after their own checks pass, then hand the result of
 * the store write to `settle`. A failed write removes the local file; remote
 * uploads cannot be removed without API credentials and are logged instead.
 */

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::UploadedFile;
use crate::shared::{AppConfig, MediaConfig};

/// URL prefix the local uploads directory is served under
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub enum MediaStore {
    Remote {
        client: reqwest::Client,
        config: MediaConfig,
    },
    Local {
        dir: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Lowercase alphanumeric extension of `file_name`, `bin` when there is none
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

impl MediaStore {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.media {
            Some(media) => Self::Remote {
                client: reqwest::Client::new(),
                config: media.clone(),
            },
            None => Self::Local {
                dir: config.uploads_dir.clone(),
            },
        }
    }

    /// Store the file and return its public URL
    pub async fn store(&self, file: UploadedFile) -> Result<String, BackendError> {
        match self {
            Self::Remote { client, config } => upload_remote(client, config, file).await,
            Self::Local { dir } => write_local(dir, file).await,
        }
    }

    /// Store the file when one was uploaded
    pub async fn store_optional(&self, file: Option<UploadedFile>) -> Result<Option<String>, BackendError> {
        match file {
            Some(file) => self.store(file).await.map(Some),
            None => Ok(None),
        }
    }

    /// Pass `result` through, discarding `uploaded` when it is an error
    pub async fn settle<T, E>(&self, uploaded: Option<&str>, result: Result<T, E>) -> Result<T, E> {
        if result.is_err() {
            if let Some(url) = uploaded {
                self.discard(url).await;
            }
        }
        result
    }

    /// Remove an upload that no record refers to
    pub async fn discard(&self, url: &str) {
        match self {
            Self::Local { dir } => {
                let Some(name) = local_name(url) else {
                    tracing::warn!("Not a local upload, left in place: {}", url);
                    return;
                };
                match tokio::fs::remove_file(dir.join(name)).await {
                    Ok(()) => tracing::info!("Removed orphaned upload {}", name),
                    Err(e) => tracing::warn!("Cannot remove orphaned upload {}: {}", name, e),
                }
            }
            Self::Remote { .. } => {
                tracing::warn!("Orphaned upload left on the media service: {}", url);
            }
        }
    }
}

/// File name of a `/uploads/<name>` URL; nested paths are refused
fn local_name(url: &str) -> Option<&str> {
    url.strip_prefix(UPLOADS_ROUTE)?
        .strip_prefix('/')
        .filter(|name| !name.is_empty() && !name.contains('/') && !name.contains(".."))
}

async fn upload_remote(
    client: &reqwest::Client,
    config: &MediaConfig,
    file: UploadedFile,
) -> Result<String, BackendError> {
    let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
    if let Some(content_type) = &file.content_type {
        part = part
            .mime_str(content_type)
            .map_err(|_| BackendError::validation("Invalid media content type"))?;
    }

    let mut form = Form::new()
        .part("file", part)
        .text("folder", config.folder.clone());
    if let Some(preset) = &config.upload_preset {
        form = form.text("upload_preset", preset.clone());
    }

    let response = client
        .post(&config.upload_url)
        .multipart(form)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| BackendError::internal(format!("media upload failed: {}", e)))?;

    let body: UploadResponse = response
        .json()
        .await
        .map_err(|e| BackendError::internal(format!("media upload response unreadable: {}", e)))?;

    tracing::info!("Uploaded {} to {}", file.file_name, body.secure_url);
    Ok(body.secure_url)
}

async fn write_local(dir: &Path, file: UploadedFile) -> Result<String, BackendError> {
    let name = format!("{}.{}", Uuid::new_v4(), extension_of(&file.file_name));

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| BackendError::internal(format!("cannot create {}: {}", dir.display(), e)))?;
    tokio::fs::write(dir.join(&name), &file.bytes)
        .await
        .map_err(|e| BackendError::internal(format!("cannot write upload {}: {}", name, e)))?;

    tracing::info!("Stored upload {} locally as {}", file.file_name, name);
    Ok(format!("{}/{}", UPLOADS_ROUTE, name))
}
