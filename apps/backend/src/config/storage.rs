use std::path::PathBuf;

use super::env::{must_var, opt_var};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct LocalStorageConfig {
    pub root: PathBuf,
}

impl LocalStorageConfig {
    pub fn from_env() -> Self {
        Self {
            root: opt_var("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
        }
    }
}

/// S3-compatible object store settings. `endpoint_url` is set for MinIO and
/// other non-AWS providers and switches the client to path-style addressing.
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub endpoint_url: Option<String>,
}

impl S3Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            bucket: must_var("AWS_BUCKET_NAME")?,
            access_key: must_var("AWS_ACCESS_KEY")?,
            secret_key: must_var("AWS_SECRET_KEY")?,
            region: opt_var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint_url: opt_var("AWS_ENDPOINT_URL"),
        })
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish_non_exhaustive()
    }
}
