//! Uploads of policy documents, customer policies and general files.

use crate::document::{decode_policy_text, file_name_of, DocumentKind, OCTET_STREAM};
use crate::keys;
use crate::progress::ProgressReporter;
use crate::storage::{ObjectStore, PutObject};
use crate::types::{UploadReceipt, UploadStats};
use chrono::Utc;
use policyguide_core::{AppError, AppResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};
use walkdir::WalkDir;

/// Lifetime of presigned upload URLs.
pub const PRESIGN_EXPIRY: Duration = Duration::from_secs(3600);

/// A presigned PUT target.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUpload {
    pub url: String,
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub expires_in: u64,
}

/// Upload every PDF directly inside `dir` to `policy_docs/`.
///
/// Files that fail to read or store are logged and skipped. It is an error
/// when nothing was uploaded.
pub async fn upload_policy_documents(
    store: &dyn ObjectStore,
    dir: &Path,
    progress: &ProgressReporter,
) -> AppResult<UploadStats> {
    if !dir.is_dir() {
        return Err(AppError::Ingestion(format!(
            "Policy documents directory not found: {:?}",
            dir
        )));
    }

    let files = discover_pdfs(dir);
    let total = files.len() as u64;
    tracing::info!("Found {} policy documents in {:?}", total, dir);

    let mut stats = UploadStats::default();

    for path in files {
        let name = match file_name_of(&path) {
            Ok(name) => name,
            Err(e) => {
                let label = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                tracing::warn!("Skipping {}: {}", label, e);
                stats.failed.push(label);
                continue;
            }
        };
        match upload_policy_document(store, &path, &name).await {
            Ok(receipt) => {
                stats.uploaded.push(receipt);
                progress.upload(stats.uploaded.len() as u64, Some(total), &name);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", name, e);
                stats.failed.push(name);
            }
        }
    }

    if stats.uploaded.is_empty() {
        return Err(AppError::Ingestion(
            "No policy documents found to upload".to_string(),
        ));
    }

    tracing::info!(
        uploaded = stats.uploaded.len(),
        failed = stats.failed.len(),
        "Policy document upload finished"
    );

    Ok(stats)
}

/// `*.pdf` files at the top level of `dir`, sorted by name.
fn discover_pdfs(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| DocumentKind::from_path(p) == DocumentKind::Pdf)
        .collect();
    files.sort();
    files
}

async fn upload_policy_document(
    store: &dyn ObjectStore,
    path: &Path,
    name: &str,
) -> AppResult<UploadReceipt> {
    let body = tokio::fs::read(path).await?;
    let modified = tokio::fs::metadata(path)
        .await?
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let key = keys::policy_doc_key(name);
    let size_bytes = body.len() as u64;

    store
        .put_object(
            PutObject::new(key.clone(), body)
                .with_content_type(DocumentKind::Pdf.content_type())
                .with_metadata("source", "policy_documents")
                .with_metadata("type", "insurance_policy")
                .with_metadata("uploaded_at", modified.to_string()),
        )
        .await?;

    Ok(UploadReceipt {
        bucket: store.bucket().to_string(),
        key,
        original_filename: name.to_string(),
        category: "policy_documents".to_string(),
        size_bytes,
        uploaded_at: Utc::now(),
    })
}

/// Store a customer's policy as text at `customer_policy/{id}.txt`.
pub async fn upload_customer_policy(
    store: &dyn ObjectStore,
    customer_id: &str,
    filename: &str,
    content: &[u8],
) -> AppResult<UploadReceipt> {
    require_non_empty("customer id", customer_id)?;
    require_file(filename, content)?;

    let text = decode_policy_text(filename, content)?;
    let key = keys::customer_policy_key(customer_id);
    let uploaded_at = Utc::now();
    let size_bytes = text.len() as u64;

    store
        .put_object(
            PutObject::new(key.clone(), text.into_bytes())
                .with_content_type("text/plain")
                .with_metadata("customer", customer_id)
                .with_metadata("original_filename", filename)
                .with_metadata("uploaded_at", uploaded_at.to_rfc3339())
                .with_metadata("document_type", "customer_policy"),
        )
        .await?;

    tracing::info!("Customer policy uploaded for {}", customer_id);

    Ok(UploadReceipt {
        bucket: store.bucket().to_string(),
        key,
        original_filename: filename.to_string(),
        category: "customer_policy".to_string(),
        size_bytes,
        uploaded_at,
    })
}

/// Store a general document at `uploads/{category}/{uuid}_{filename}`.
pub async fn upload_document(
    store: &dyn ObjectStore,
    filename: &str,
    category: &str,
    content: &[u8],
) -> AppResult<UploadReceipt> {
    require_file(filename, content)?;

    let category = match category.trim() {
        "" => keys::DEFAULT_CATEGORY,
        c => c,
    };
    let file_id = uuid::Uuid::new_v4().to_string();
    let key = keys::upload_key(category, &file_id, filename);
    let uploaded_at = Utc::now();

    store
        .put_object(
            PutObject::new(key.clone(), content.to_vec())
                .with_content_type(DocumentKind::from_name(filename).content_type())
                .with_metadata("original_filename", filename)
                .with_metadata("category", category)
                .with_metadata("uploaded_at", uploaded_at.to_rfc3339())
                .with_metadata("file_id", file_id.as_str()),
        )
        .await?;

    tracing::info!("Document uploaded to {} category", category);

    Ok(UploadReceipt {
        bucket: store.bucket().to_string(),
        key,
        original_filename: filename.to_string(),
        category: category.to_string(),
        size_bytes: content.len() as u64,
        uploaded_at,
    })
}

/// Presigned PUT URL for a direct upload.
///
/// With a customer the target is `customer_policy/{id}_{filename}`, otherwise
/// `uploads/general/{uuid}_{filename}`. The caller passes the matching store.
pub async fn upload_url(
    store: &dyn ObjectStore,
    filename: &str,
    customer_id: Option<&str>,
) -> AppResult<PresignedUpload> {
    require_non_empty("filename", filename)?;

    let key = match customer_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => keys::customer_upload_key(id, filename),
        None => keys::upload_key(
            keys::DEFAULT_CATEGORY,
            &uuid::Uuid::new_v4().to_string(),
            filename,
        ),
    };

    let url = store.presign_put(&key, OCTET_STREAM, PRESIGN_EXPIRY).await?;

    Ok(PresignedUpload {
        url,
        bucket: store.bucket().to_string(),
        key,
        content_type: OCTET_STREAM.to_string(),
        expires_in: PRESIGN_EXPIRY.as_secs(),
    })
}

fn require_non_empty(what: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", what)));
    }
    Ok(())
}

fn require_file(filename: &str, content: &[u8]) -> AppResult<()> {
    require_non_empty("filename", filename)?;
    if content.is_empty() {
        return Err(AppError::Validation(
            "file content and filename are required".to_string(),
        ));
    }
    Ok(())
}
