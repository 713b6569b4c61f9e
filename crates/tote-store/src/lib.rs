//! # Tote Store
//!
//! Object storage layer for the Tote gateway.
//!
//! This crate provides:
//! - **ObjectStore trait**: put, get, list and delete objects in one container
//! - **S3 backend**: Amazon S3 or any S3-compatible service (MinIO, R2)
//! - **Memory backend**: in-process store for development and tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Tote Gateway               │
//! ├─────────────────────────────────────────┤
//! │           ObjectStore Trait             │
//! ├────────────────────┬────────────────────┤
//! │   S3ObjectStore    │ MemoryObjectStore  │
//! ├────────────────────┴────────────────────┤
//! │        S3 / S3-compatible service       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tote_store::{MemoryObjectStore, ObjectStore};
//!
//! let store = MemoryObjectStore::new();
//! store.put_object("hello.txt", Bytes::from_static(b"hi"), Some("text/plain")).await?;
//! let object = store.get_object("hello.txt").await?;
//! ```

pub mod error;
pub mod flexible;
pub mod memory;
pub mod object;
pub mod s3;

pub use error::{Result, StoreError};
pub use flexible::FlexibleObjectStore;
pub use memory::MemoryObjectStore;
pub use object::{ObjectStream, StoredObject};
pub use s3::{S3Config, S3ObjectStore};

use async_trait::async_trait;
use bytes::Bytes;

/// Trait for object storage backends bound to a single container
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object
    async fn put_object(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()>;

    /// Open an object for streaming
    async fn get_object(&self, key: &str) -> Result<StoredObject>;

    /// List keys in the container (first page only)
    async fn list_objects(&self) -> Result<Vec<String>>;

    /// Delete an object. Missing keys follow the backend's own semantics.
    async fn delete_object(&self, key: &str) -> Result<()>;
}
