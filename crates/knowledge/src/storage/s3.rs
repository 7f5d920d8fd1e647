//! Amazon S3 object store.

use super::{ObjectStore, PutObject};
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use policyguide_core::{AppError, AppResult};
use std::time::Duration;

/// Object store backed by one S3 bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(sdk_config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self::from_client(Client::new(sdk_config), bucket)
    }

    /// Share one S3 client between several buckets.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get_text(&self, key: &str) -> AppResult<Option<String>> {
        tracing::debug!("Fetching {}", self.location(key));

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    tracing::debug!("No object at {}", self.location(key));
                    return Ok(None);
                }
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.location(key),
                    DisplayErrorContext(&err)
                )));
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to read body of {}: {}", self.location(key), e))
            })?
            .into_bytes();

        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn put_object(&self, object: PutObject) -> AppResult<()> {
        let size = object.body.len();
        let location = self.location(&object.key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body))
            .set_content_type(object.content_type)
            .set_metadata(Some(object.metadata.into_iter().collect()))
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to write {}: {}",
                    location,
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!(bytes = size, "Stored {}", location);
        Ok(())
    }

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String> {
        let config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| AppError::Storage(format!("Invalid presign expiry: {}", e)))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(config)
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to presign {}: {}",
                    self.location(key),
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!(expires_secs = expires_in.as_secs(), "Presigned {}", self.location(key));
        Ok(request.uri().to_string())
    }
}
