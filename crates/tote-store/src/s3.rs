//! Amazon S3 object store
//!
//! Every call is a single SDK request against the configured bucket. SDK
//! errors are rendered with [`DisplayErrorContext`] so the provider's message
//! reaches the caller untranslated.

use crate::{ObjectStore, Result, StoreError, StoredObject};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use tracing::debug;

/// S3 connection settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region, e.g. `us-east-1`
    pub region: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket holding all objects served by the gateway
    pub bucket: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2)
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (`endpoint/bucket/key`)
    pub force_path_style: bool,
}

impl S3Config {
    /// Check that every required setting is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("region", &self.region),
            ("access key id", &self.access_key_id),
            ("secret access key", &self.secret_access_key),
            ("bucket", &self.bucket),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(StoreError::Configuration(format!("S3 {} is not set", name)));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// Object store backed by one S3 bucket
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a client with static credentials. No request is sent, so bad
    /// credentials only surface on the first operation.
    pub async fn new(config: S3Config) -> Result<Self> {
        config.validate()?;

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "Env",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style);

        if let Some(ref endpoint) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket,
        })
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn backend_error<E>(err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::Backend(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()> {
        debug!(bucket = %self.bucket, key = %key, size = data.len(), "PutObject");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject> {
        debug!(bucket = %self.bucket, key = %key, "GetObject");

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(backend_error)?;

        let content_type = output.content_type().map(str::to_string);
        let content_length = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok());

        // Dropping the stream drops the underlying connection, which aborts
        // the fetch when the caller goes away.
        let body = ReaderStream::new(output.body.into_async_read())
            .map_err(StoreError::from)
            .boxed();

        Ok(StoredObject {
            content_type,
            content_length,
            body,
        })
    }

    async fn list_objects(&self) -> Result<Vec<String>> {
        debug!(bucket = %self.bucket, "ListObjectsV2");

        // First page only; continuation tokens are not followed.
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(backend_error)?;

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        debug!(bucket = %self.bucket, key = %key, "DeleteObject");

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}
