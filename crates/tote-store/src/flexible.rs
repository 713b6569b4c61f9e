//! Backend selection between S3 and in-memory storage

use crate::{MemoryObjectStore, ObjectStore, Result, S3Config, S3ObjectStore, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

/// Object store that can use S3 or in-memory storage
pub enum FlexibleObjectStore {
    /// Amazon S3 or an S3-compatible service
    S3(S3ObjectStore),
    /// In-memory storage (development only)
    Memory(MemoryObjectStore),
}

impl FlexibleObjectStore {
    /// Build the S3 backend. Configuration errors are returned, never
    /// replaced by a memory fallback.
    pub async fn s3(config: S3Config) -> Result<Self> {
        let store = S3ObjectStore::new(config).await?;
        info!(bucket = %store.bucket(), "Using S3 object store");
        Ok(Self::S3(store))
    }

    /// Build the in-memory backend
    pub fn memory() -> Self {
        info!("Using in-memory object store (data will not persist)");
        Self::Memory(MemoryObjectStore::new())
    }

    /// Check if using real object storage or memory
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::S3(_))
    }
}

#[async_trait]
impl ObjectStore for FlexibleObjectStore {
    async fn put_object(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()> {
        match self {
            Self::S3(store) => store.put_object(key, data, content_type).await,
            Self::Memory(store) => store.put_object(key, data, content_type).await,
        }
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject> {
        match self {
            Self::S3(store) => store.get_object(key).await,
            Self::Memory(store) => store.get_object(key).await,
        }
    }

    async fn list_objects(&self) -> Result<Vec<String>> {
        match self {
            Self::S3(store) => store.list_objects().await,
            Self::Memory(store) => store.list_objects().await,
        }
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        match self {
            Self::S3(store) => store.delete_object(key).await,
            Self::Memory(store) => store.delete_object(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_variant_delegates() {
        let store = FlexibleObjectStore::memory();
        assert!(!store.is_persistent());

        store.put_object("k", Bytes::from_static(b"v"), None).await.unwrap();
        assert_eq!(store.list_objects().await.unwrap(), vec!["k"]);
        store.delete_object("k").await.unwrap();
        assert!(store.list_objects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_s3_variant_rejects_incomplete_config() {
        let result = FlexibleObjectStore::s3(S3Config::default()).await;
        assert!(matches!(result, Err(crate::StoreError::Configuration(_))));
    }
}
