//! S3 object store implementation

use crate::config::Credentials;
use crate::storage::{ObjectStore, PutObject, PutObjectOutcome, StorageError};
use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use log::{debug, error, info};

/// Object store backed by an S3 bucket
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client for `region` with explicit credentials.
    ///
    /// Retries are disabled: every upload is a single attempt.
    pub fn new(region: &str, credentials: &Credentials) -> Self {
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "edge-kv",
            ))
            .retry_config(RetryConfig::disabled())
            .build();
        info!("Created S3 client for region {}", region);
        Self::from_client(Client::from_conf(conf))
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn md5_base64(data: &[u8]) -> String {
        B64.encode(md5::compute(data).0)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, request: PutObject) -> Result<PutObjectOutcome, StorageError> {
        debug!("S3 PUT Object: bucket={}, key={}, size={}",
               request.bucket, request.key, request.body.len());

        let checksum = Self::md5_base64(&request.body);
        let mut builder = self.client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .content_type(&request.content_type)
            .content_md5(checksum)
            .set_metadata(Some(request.metadata))
            .body(ByteStream::from(request.body));
        if request.public_read {
            builder = builder.acl(ObjectCannedAcl::PublicRead);
        }

        let output = builder.send().await.map_err(|e| {
            error!("S3 PUT failed for bucket={}, key={}: {}",
                   request.bucket, request.key, DisplayErrorContext(&e));
            StorageError::Backend(DisplayErrorContext(&e).to_string())
        })?;

        Ok(PutObjectOutcome {
            etag: output.e_tag().map(|s| s.to_string()),
        })
    }
}
