//! Object payload types

use crate::Result;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};

/// Lazy byte stream of an object payload
pub type ObjectStream = BoxStream<'static, Result<Bytes>>;

/// An object opened for reading
pub struct StoredObject {
    /// Content type recorded by the store, if any
    pub content_type: Option<String>,
    /// Payload size in bytes, if the store reports it
    pub content_length: Option<u64>,
    /// Payload
    pub body: ObjectStream,
}

impl StoredObject {
    /// Wrap an in-memory payload as a single-chunk stream
    pub fn from_bytes(data: Bytes, content_type: Option<String>) -> Self {
        Self {
            content_type,
            content_length: Some(data.len() as u64),
            body: stream::once(async move { Ok(data) }).boxed(),
        }
    }

    /// Drain the body into one buffer
    pub async fn collect(mut self) -> Result<Bytes> {
        let mut buf = Vec::with_capacity(self.content_length.unwrap_or(0) as usize);
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(Bytes::from(buf))
    }
}

impl std::fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
