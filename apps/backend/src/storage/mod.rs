//! Blob storage behind one async capability, with a local-disk variant for
//! development and an S3 variant everywhere else.

pub mod local;
pub mod s3;

use std::io;
use std::path::{Component, Path};
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub use local::LocalStorage;
pub use s3::S3Storage;

use crate::config::env::Environment;
use crate::config::storage::{LocalStorageConfig, S3Config};
use crate::error::AppError;

pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Storage configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Stores `content` under `path` and returns where it can be fetched from.
    async fn upload(
        &self,
        content: Bytes,
        path: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    async fn download(&self, path: &str) -> Result<ByteStream, StorageError>;

    /// `false` when nothing was deleted.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;
}

/// Development gets the local disk, every other environment the object store.
pub fn select_storage(
    environment: Environment,
    local: LocalStorageConfig,
    s3: Option<S3Config>,
) -> Result<Arc<dyn Storage>, StorageError> {
    if environment.is_development() {
        info!(root = %local.root.display(), "Using local file storage");
        return Ok(Arc::new(LocalStorage::new(local.root)));
    }
    let s3 = s3.ok_or_else(|| {
        StorageError::Config(format!("{environment:?} requires S3 storage settings"))
    })?;
    info!(bucket = %s3.bucket, "Using S3 object storage");
    Ok(Arc::new(S3Storage::new(s3)))
}

/// Reads whichever settings the environment needs and builds the backend.
pub fn storage_from_env(environment: Environment) -> Result<Arc<dyn Storage>, AppError> {
    let s3 = if environment.is_development() {
        None
    } else {
        Some(S3Config::from_env()?)
    };
    Ok(select_storage(environment, LocalStorageConfig::from_env(), s3)?)
}

/// `<uuid v4>.<original extension>`, or just the uuid when there is none.
pub fn unique_file_path(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
    {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Relative, `/`-joined key with no parent or root components.
pub(crate) fn normalize_key(path: &str) -> Result<String, StorageError> {
    let invalid = || StorageError::InvalidPath(path.to_string());
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(invalid());
    }

    let mut parts = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid())
            }
        }
    }

    if parts.is_empty() {
        return Err(invalid());
    }
    Ok(parts.join("/"))
}
