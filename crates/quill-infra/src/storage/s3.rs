//! S3-compatible object store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

use quill_core::ports::{ObjectStore, StorageError};

use super::S3Config;

/// Object store backed by S3 or an S3-compatible service.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    config: S3Config,
}

impl S3ObjectStore {
    /// Build a client from the default credential chain and verify that
    /// the configured bucket is reachable.
    pub async fn new(config: S3Config) -> Result<Self, StorageError> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        let client = Client::from_conf(s3_config);

        if let Err(e) = client.head_bucket().bucket(&config.bucket).send().await {
            return Err(StorageError::Configuration(format!(
                "Cannot access S3 bucket '{}': {}",
                config.bucket, e
            )));
        }

        tracing::info!(bucket = %config.bucket, region = %config.region, "S3 object store initialized");

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_public(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 put failed: {e}")))?;

        Ok(self.config.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 delete failed: {e}")))?;

        Ok(())
    }
}
