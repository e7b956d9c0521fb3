use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::{normalize_key, ByteStream, Storage, StorageError};

/// Mount point the web layer serves the storage root under.
pub const PUBLIC_PREFIX: &str = "/public";

/// Files under a root directory. All I/O goes through `tokio::fs`, which
/// runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<(String, PathBuf), StorageError> {
        let key = normalize_key(path)?;
        let full = self.root.join(&key);
        Ok((key, full))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        content: Bytes,
        path: &str,
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let (key, full) = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, &content).await?;
        debug!(key = %key, bytes = content.len(), "Stored file locally");
        Ok(format!("{PUBLIC_PREFIX}/{key}"))
    }

    async fn download(&self, path: &str) -> Result<ByteStream, StorageError> {
        let (key, full) = self.resolve(path)?;
        let file = tokio::fs::File::open(&full).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(key.clone()),
            _ => StorageError::Io(e),
        })?;
        Ok(ReaderStream::new(file).boxed())
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let (key, full) = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                debug!(key = %key, "Deleted local file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}
