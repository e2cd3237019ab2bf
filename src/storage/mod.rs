//! Object Storage Layer Abstraction
//!
//! This module provides an abstraction over the blob store that holds the
//! JSON documents, so the key-value facade can run against S3 in production
//! and an in-memory store in tests without changing higher-level code.

pub mod s3_store;
pub mod mock_store;

use std::collections::HashMap;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Content type of every stored document
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// User metadata attached to every upload: one year of client caching
pub const CACHE_CONTROL_METADATA: (&str, &str) = ("cache-control", "max-age=31536000");

/// Errors reported by an object store backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The upload request could not be built
    #[error("invalid upload request: {0}")]
    InvalidRequest(String),
    /// The backend rejected or failed the upload
    #[error("object store error: {0}")]
    Backend(String),
}

/// A single upload of one object
#[derive(Debug, Clone, PartialEq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    /// Grant anonymous read access to the object
    pub public_read: bool,
    pub metadata: HashMap<String, String>,
}

impl PutObject {
    /// Build the upload used for JSON documents: public, `application/json`,
    /// tagged with the one-year cache-control metadata.
    pub fn json_document(bucket: &str, key: &str, body: impl Into<Bytes>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(CACHE_CONTROL_METADATA.0.to_string(), CACHE_CONTROL_METADATA.1.to_string());
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: body.into(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            public_read: true,
            metadata,
        }
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutObjectOutcome {
    /// Entity tag reported by the backend, if any
    pub etag: Option<String>,
}

/// Trait defining the object store interface
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object, replacing any previous version at the same key
    async fn put_object(&self, request: PutObject) -> Result<PutObjectOutcome, StorageError>;
}
