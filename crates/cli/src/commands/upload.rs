//! Upload command handlers.
//!
//! Stores general documents and hands out presigned URLs for direct uploads.

use super::print_json;
use clap::Args;
use policyguide_core::{config::AppConfig, AppError, AppResult};
use policyguide_knowledge::document::{file_name_of, OCTET_STREAM};
use policyguide_knowledge::ingest::{upload_document, upload_url, PresignedUpload};
use policyguide_knowledge::keys::DEFAULT_CATEGORY;
use policyguide_knowledge::{Backends, PutObject};
use std::path::{Path, PathBuf};

/// Upload a general document
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// File to upload
    pub file: PathBuf,

    /// Category folder under uploads/
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl UploadCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing upload command for {:?}", self.file);

        let filename = file_name_of(&self.file)?;
        let content = tokio::fs::read(&self.file).await?;

        let backends = Backends::from_config(config).await?;
        let store = backends.uploads()?;

        let receipt = upload_document(store.as_ref(), &filename, &self.category, &content).await?;

        if self.json {
            print_json(&receipt)?;
        } else {
            println!(
                "Document uploaded to {} category: s3://{}/{} ({} bytes)",
                receipt.category, receipt.bucket, receipt.key, receipt.size_bytes
            );
        }

        Ok(())
    }
}

/// Create a presigned upload URL
#[derive(Args, Debug)]
pub struct UploadUrlCommand {
    /// Name of the file to be uploaded
    pub filename: String,

    /// Target the customer's policy folder instead of general uploads
    #[arg(short = 'u', long)]
    pub customer: Option<String>,

    /// Upload this file to the URL right away
    #[arg(long, value_name = "FILE")]
    pub put: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl UploadUrlCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing upload-url command for {}", self.filename);

        let backends = Backends::from_config(config).await?;
        let store = match self.customer {
            Some(_) => backends.customer_policies()?,
            None => backends.uploads()?,
        };

        let presigned = upload_url(store.as_ref(), &self.filename, self.customer.as_deref()).await?;

        if let Some(path) = &self.put {
            if backends.is_demo() {
                // Demo URLs are not reachable; write straight to the store
                let body = tokio::fs::read(path).await?;
                store
                    .put_object(
                        PutObject::new(presigned.key.clone(), body).with_content_type(OCTET_STREAM),
                    )
                    .await?;
            } else {
                put_file(&presigned, path).await?;
            }
        }

        if self.json {
            print_json(&presigned)?;
        } else {
            println!("{}", presigned.url);
            println!(
                "Key: s3://{}/{} (expires in {}s)",
                presigned.bucket, presigned.key, presigned.expires_in
            );
            if self.put.is_some() {
                println!("Uploaded {}", presigned.key);
            }
        }

        Ok(())
    }
}

/// PUT a local file to a presigned URL.
async fn put_file(presigned: &PresignedUpload, path: &Path) -> AppResult<()> {
    let body = tokio::fs::read(path).await?;
    let size = body.len();

    tracing::debug!("PUT {} bytes to presigned URL for {}", size, presigned.key);

    let response = reqwest::Client::new()
        .put(&presigned.url)
        .header(reqwest::header::CONTENT_TYPE, &presigned.content_type)
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Storage(format!(
            "Upload rejected with status {}: {}",
            status, body
        )));
    }

    tracing::info!(bytes = size, "Uploaded {} via presigned URL", presigned.key);
    Ok(())
}
