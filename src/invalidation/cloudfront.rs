//! CloudFront invalidation backend

use crate::config::Credentials;
use crate::invalidation::{CacheInvalidator, InvalidationError, InvalidationRequest};
use async_trait::async_trait;
use aws_sdk_cloudfront::config::retry::RetryConfig;
use aws_sdk_cloudfront::config::{BehaviorVersion, Region};
use aws_sdk_cloudfront::error::DisplayErrorContext;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_cloudfront::Client;
use log::{debug, error, info};

/// Invalidates paths of a CloudFront distribution
pub struct CloudFrontInvalidator {
    client: Client,
}

impl CloudFrontInvalidator {
    /// Build a client with explicit credentials. CloudFront is a global
    /// service; the region only selects the signing endpoint.
    pub fn new(region: &str, credentials: &Credentials) -> Self {
        let conf = aws_sdk_cloudfront::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(aws_sdk_cloudfront::config::Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "edge-kv",
            ))
            .retry_config(RetryConfig::disabled())
            .build();
        info!("Created CloudFront client for region {}", region);
        Self::from_client(Client::from_conf(conf))
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CacheInvalidator for CloudFrontInvalidator {
    async fn create_invalidation(&self, request: InvalidationRequest) -> Result<(), InvalidationError> {
        let quantity = i32::try_from(request.quantity())
            .map_err(|_| InvalidationError::InvalidRequest("too many paths".to_string()))?;
        let paths = Paths::builder()
            .quantity(quantity)
            .set_items(Some(request.paths))
            .build()
            .map_err(|e| InvalidationError::InvalidRequest(e.to_string()))?;
        let batch = InvalidationBatch::builder()
            .caller_reference(&request.caller_reference)
            .paths(paths)
            .build()
            .map_err(|e| InvalidationError::InvalidRequest(e.to_string()))?;

        let output = self.client
            .create_invalidation()
            .distribution_id(&request.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|e| {
                error!("CloudFront invalidation failed for distribution {}: {}",
                       request.distribution_id, DisplayErrorContext(&e));
                InvalidationError::Backend(DisplayErrorContext(&e).to_string())
            })?;

        debug!("CloudFront accepted invalidation: {:?}", output.invalidation());
        Ok(())
    }
}
