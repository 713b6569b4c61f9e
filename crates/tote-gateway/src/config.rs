//! Gateway configuration

use serde::{Deserialize, Serialize};
use tote_store::S3Config;

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// S3 backend settings (ignored when `use_memory_store` is set)
    pub s3: S3Config,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            s3: S3Config::default(),
            use_memory_store: false,
            max_body_size: 5 * 1024 * 1024 * 1024, // 5 GB
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations the gateway cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_body_size == 0 {
            anyhow::bail!("max body size must be greater than zero");
        }
        if !self.use_memory_store {
            self.s3.validate()?;
        }
        Ok(())
    }
}
