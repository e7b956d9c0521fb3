use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream as S3Body;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::{stream, StreamExt};
use tracing::{debug, warn};

use super::{normalize_key, ByteStream, Storage, StorageError};
use crate::config::storage::S3Config;
use crate::logging::pii::Redacted;

/// One bucket of an S3-compatible store.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(config: S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "static",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::from_client(Client::from_conf(builder.build()), config.bucket)
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(
        &self,
        content: Bytes,
        path: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let key = normalize_key(path)?;
        debug!(bucket = %self.bucket, key = %key, bytes = content.len(), "Uploading object");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(S3Body::from(content))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        Ok(format!("s3://{}/{key}", self.bucket))
    }

    /// Buffers the whole object, then yields it as a single chunk.
    async fn download(&self, path: &str) -> Result<ByteStream, StorageError> {
        let key = normalize_key(path)?;
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound(key.clone())
                } else {
                    StorageError::Backend(DisplayErrorContext(&e).to_string())
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?
            .into_bytes();

        Ok(stream::once(async move { Ok(data) }).boxed())
    }

    /// Any failure, including an unusable key, is logged and reported as `false`.
    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let key = match normalize_key(path) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "S3 delete skipped");
                return Ok(false);
            }
        };
        match self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket = %self.bucket, key = %Redacted(&key), error = %DisplayErrorContext(&e), "S3 delete failed");
                Ok(false)
            }
        }
    }
}
