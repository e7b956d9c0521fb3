//! File upload and removal through the configured `Storage` backend.

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::storage::{unique_file_path, Storage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// Key under which the content was stored.
    pub key: String,
    /// Location reported by the backend (`/public/...` or `s3://...`).
    pub path: String,
}

/// Stores `content` under a fresh `<uuid>.<ext>` key derived from `original_name`.
pub async fn upload_file(
    storage: &dyn Storage,
    original_name: &str,
    content: Bytes,
    content_type: Option<&str>,
) -> Result<StoredFile, AppError> {
    let key = unique_file_path(original_name);
    let size = content.len();
    let path = storage.upload(content, &key, content_type).await?;
    info!(key = %Redacted(&key), size, "File uploaded");
    Ok(StoredFile { key, path })
}

pub async fn delete_file(storage: &dyn Storage, path: &str) -> Result<(), AppError> {
    if !storage.delete(path).await? {
        return Err(AppError::not_found(ErrorCode::FileNotFound, "File not found"));
    }
    info!(key = %Redacted(path), "File deleted");
    Ok(())
}
