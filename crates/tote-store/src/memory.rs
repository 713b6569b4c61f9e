//! In-memory object store for development and testing

use crate::{ObjectStore, Result, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
}

/// An in-memory object store
///
/// Each put replaces the whole entry, so concurrent writers to one key never
/// interleave: the last insert wins.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<String, MemoryObject>>,
}

impl MemoryObjectStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
        }
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get total size of all objects
    pub fn total_size(&self) -> u64 {
        self.objects.iter().map(|entry| entry.value().data.len() as u64).sum()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()> {
        self.objects.insert(
            key.to_string(),
            MemoryObject {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject> {
        let object = self
            .objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(StoredObject::from_bytes(object.data, object.content_type))
    }

    async fn list_objects(&self) -> Result<Vec<String>> {
        // S3 lists in key order; mirror that
        let mut keys: Vec<String> = self.objects.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.objects.remove(key);
        Ok(())
    }
}
