//! Edge cache invalidation
//!
//! Purging a cached path from every edge node is delegated to a
//! [`CacheInvalidator`]; CloudFront in production, an in-memory recorder in
//! tests.

pub mod cloudfront;
pub mod mock_invalidator;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by an invalidation backend
#[derive(Debug, Error)]
pub enum InvalidationError {
    /// The invalidation request could not be built
    #[error("invalid invalidation request: {0}")]
    InvalidRequest(String),
    /// The backend rejected or failed the invalidation
    #[error("cache invalidation error: {0}")]
    Backend(String),
}

/// One invalidation batch for a distribution
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidationRequest {
    pub distribution_id: String,
    /// Unique per request; the backend uses it to tell requests apart
    pub caller_reference: String,
    /// Path patterns, each starting with `/`
    pub paths: Vec<String>,
}

impl InvalidationRequest {
    /// Build a request purging exactly one path
    pub fn single_path(distribution_id: &str, path: String) -> Self {
        Self {
            distribution_id: distribution_id.to_string(),
            caller_reference: caller_reference(),
            paths: vec![path],
        }
    }

    /// Number of path patterns in the batch
    pub fn quantity(&self) -> usize {
        self.paths.len()
    }
}

/// Generate a caller reference: Unix milliseconds plus a random suffix, so two
/// invalidations issued within the same millisecond stay distinct.
pub fn caller_reference() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
}

/// Trait defining the edge cache invalidation interface
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn create_invalidation(&self, request: InvalidationRequest) -> Result<(), InvalidationError>;
}
