//! In-memory object store for demo mode and tests.

use super::{ObjectStore, PutObject};
use policyguide_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// An object held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// Object store that keeps everything in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    /// Seed a text object.
    pub fn with_text(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.objects().insert(
            key.into(),
            StoredObject {
                body: text.into().into_bytes(),
                content_type: Some("text/plain".to_string()),
                metadata: BTreeMap::new(),
            },
        );
        self
    }

    /// Copy of the object stored under `key`.
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects().get(key).cloned()
    }

    /// All keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.objects().keys().cloned().collect()
    }

    fn objects(&self) -> MutexGuard<'_, BTreeMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get_text(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .objects()
            .get(key)
            .map(|object| String::from_utf8_lossy(&object.body).into_owned()))
    }

    async fn put_object(&self, object: PutObject) -> AppResult<()> {
        if object.key.is_empty() {
            return Err(AppError::Storage("Object key cannot be empty".to_string()));
        }

        tracing::debug!(bytes = object.body.len(), "Storing memory://{}/{}", self.bucket, object.key);

        self.objects().insert(
            object.key,
            StoredObject {
                body: object.body,
                content_type: object.content_type,
                metadata: object.metadata,
            },
        );
        Ok(())
    }

    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> AppResult<String> {
        Ok(format!(
            "memory://{}/{}?expires_in={}",
            self.bucket,
            key,
            expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryStore::new("policies");
        assert_eq!(store.get_text("customer_policy/nobody.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryStore::new("policies");
        store
            .put_object(
                PutObject::new("customer_policy/john_doe.txt", "Deductible: $500")
                    .with_content_type("text/plain")
                    .with_metadata("customer", "john_doe"),
            )
            .await
            .unwrap();

        let text = store.get_text("customer_policy/john_doe.txt").await.unwrap();
        assert_eq!(text.as_deref(), Some("Deductible: $500"));

        let object = store.object("customer_policy/john_doe.txt").unwrap();
        assert_eq!(object.metadata["customer"], "john_doe");
        assert_eq!(store.keys(), vec!["customer_policy/john_doe.txt"]);
    }

    #[tokio::test]
    async fn test_presign_mentions_key() {
        let store = MemoryStore::new("uploads");
        let url = store
            .presign_put("uploads/general/x_a.pdf", "application/octet-stream", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.contains("uploads/general/x_a.pdf"));
        assert!(url.ends_with("3600"));
    }
}
