//! Error types for the tote-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object not found
    #[error("object not found: {0}")]
    NotFound(String),

    /// Error reported by the storage backend, message kept verbatim
    #[error("{0}")]
    Backend(String),

    /// IO error while reading an object body
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Check whether this error means the key does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
