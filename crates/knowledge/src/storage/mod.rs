//! Object storage for customer policies and uploaded documents.

pub mod memory;
pub mod s3;

pub use memory::{MemoryStore, StoredObject};
pub use s3::S3Store;

use policyguide_core::AppResult;
use std::collections::BTreeMap;
use std::time::Duration;

/// An object to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// User metadata stored with the object
    pub metadata: BTreeMap<String, String>,
}

impl PutObject {
    pub fn new(key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
            content_type: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A bucket-scoped object store.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store writes to.
    fn bucket(&self) -> &str;

    /// Read an object as text. A missing key is `Ok(None)`.
    async fn get_text(&self, key: &str) -> AppResult<Option<String>>;

    /// Write an object, replacing any existing one.
    async fn put_object(&self, object: PutObject) -> AppResult<()>;

    /// Presigned URL for a client to PUT the object directly.
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String>;
}
