//! Application state

use crate::config::GatewayConfig;
use std::sync::Arc;
use tote_store::{FlexibleObjectStore, ObjectStore};
use tracing::{info, warn};

/// Application state shared across handlers. Never mutated after startup.
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Object store (S3 or memory)
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let store = if config.use_memory_store {
            FlexibleObjectStore::memory()
        } else {
            FlexibleObjectStore::s3(config.s3.clone()).await?
        };

        // Log storage mode
        if store.is_persistent() {
            info!(bucket = %config.s3.bucket, region = %config.s3.region, "✓ Storage mode: S3 (persistent)");
        } else {
            warn!("⚠ Storage mode: In-memory (NOT persistent - for development only)");
        }

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create state around an existing store
    pub fn with_store(config: GatewayConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }
}
