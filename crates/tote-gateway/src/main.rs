//! Tote Gateway - HTTP front end for an S3 bucket

use clap::Parser;
use tote_gateway::{GatewayConfig, run_server_with_shutdown, server};
use tote_store::S3Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tote-gateway")]
#[command(about = "Upload, download, list and delete objects in an S3 bucket over HTTP")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "TOTE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "TOTE_PORT")]
    port: u16,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "")]
    region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", default_value = "")]
    access_key_id: String,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true)]
    secret_access_key: String,

    /// Bucket holding all objects
    #[arg(long, env = "S3_BUCKET_NAME", default_value = "")]
    bucket: String,

    /// Custom S3 endpoint (MinIO, R2, ...)
    #[arg(long, env = "S3_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, env = "S3_FORCE_PATH_STYLE")]
    force_path_style: bool,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, env = "TOTE_MEMORY_STORE")]
    memory_store: bool,

    /// Maximum request body size in bytes
    #[arg(long, env = "TOTE_MAX_BODY_SIZE")]
    max_body_size: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, env = "TOTE_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("tote_gateway={},tote_store={},tower_http=debug", log_level, log_level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tote Gateway on {}:{}", args.host, args.port);

    if args.memory_store {
        tracing::warn!("⚠️  Using in-memory storage - data will NOT persist!");
    } else {
        tracing::info!(region = %args.region, bucket = %args.bucket, "S3 backend");
        if let Some(ref endpoint) = args.endpoint_url {
            tracing::info!("S3 endpoint: {}", endpoint);
        }
    }

    // Build configuration
    let defaults = GatewayConfig::default();
    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        s3: S3Config {
            region: args.region,
            access_key_id: args.access_key_id,
            secret_access_key: args.secret_access_key,
            bucket: args.bucket,
            endpoint_url: args.endpoint_url,
            force_path_style: args.force_path_style,
        },
        use_memory_store: args.memory_store,
        max_body_size: args.max_body_size.unwrap_or(defaults.max_body_size),
    };

    // Run the server
    if let Err(e) = run_server_with_shutdown(config, server::ctrl_c()).await {
        tracing::error!(error = %e, "Gateway failed");
        return Err(e);
    }

    Ok(())
}
