//! # Tote Gateway
//!
//! HTTP gateway exposing upload, download, list and delete over a single S3
//! bucket.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │             (browsers, curl, scripts)               │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                    Tote Gateway                     │
//! ├─────────────────────────────────────────────────────┤
//! │        CORS │ Request ID │ Logging │ Body Limit     │
//! ├─────────────────────────────────────────────────────┤
//! │  /upload  /download/{key}  /list  /delete/{key}     │
//! ├─────────────────────────────────────────────────────┤
//! │                    tote-store                       │
//! │               (S3 or in-memory)                     │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use server::run_server_with_shutdown;
pub use state::AppState;
