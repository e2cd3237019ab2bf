//! Key-value facade over the object store, the edge cache and the edge reader
//!
//! Writes go to the bucket and invalidate the edge copy; reads go through
//! the public edge URL. The store keeps no state of its own besides its
//! configuration, so one instance can be shared freely between tasks.

pub mod payload;

#[cfg(test)]
mod comprehensive_test;

use std::sync::Arc;
use log::{info, error, debug};
use serde::Serialize;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::edge::{EdgeError, EdgeReader};
use crate::error::KvError;
use crate::invalidation::{CacheInvalidator, InvalidationRequest};
use crate::storage::{ObjectStore, PutObject};

pub use payload::Payload;

/// Outcome of a structured read
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    /// The edge reported 404
    NotFound,
    /// The read could not be completed
    Unavailable(String),
}

impl Lookup {
    /// Collapse to the value, dropping the reason of a miss
    pub fn into_value(self) -> Option<Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Unavailable(_) => None,
        }
    }
}

/// JSON key-value store on top of a bucket and its CDN distribution
pub struct KeyValueStore {
    config: StoreConfig,
    objects: Arc<dyn ObjectStore>,
    invalidator: Arc<dyn CacheInvalidator>,
    reader: Arc<dyn EdgeReader>,
}

impl KeyValueStore {
    /// Create a store with injected collaborators
    pub fn new(
        config: StoreConfig,
        objects: Arc<dyn ObjectStore>,
        invalidator: Arc<dyn CacheInvalidator>,
        reader: Arc<dyn EdgeReader>,
    ) -> Self {
        Self { config, objects, invalidator, reader }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Object key of `key` in the bucket: `<folder>/<key>.json`
    pub fn storage_path(&self, key: &str) -> String {
        format!("{}/{}.json", self.config.folder, key)
    }

    /// Public URL of `key`: `<edge_base_url>/<folder>/<key>.json`
    pub fn edge_url(&self, key: &str) -> String {
        format!("{}/{}", self.config.edge_base_url, self.storage_path(key))
    }

    /// Store `data` under `key`, then invalidate its edge copy.
    ///
    /// One attempt each. If the upload succeeds and the invalidation fails,
    /// the new object stays stored and the error is still returned.
    pub async fn set(&self, key: &str, data: impl Into<Payload>) -> Result<(), KvError> {
        let payload: Payload = data.into();
        let body = payload.encode();
        let path = self.storage_path(key);

        let result = self.write(key, &path, body).await;
        if let Err(e) = &result {
            error!("Failed to set key {}: {}", key, e);
        }
        result
    }

    /// Store any serializable value under `key`
    pub async fn set_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let body = serde_json::to_string(value).map_err(|source| KvError::Encode {
            key: key.to_string(),
            source,
        })?;
        // Serialized output is JSON text, which the text branch keeps verbatim
        self.set(key, Payload::Text(body)).await
    }

    async fn write(&self, key: &str, path: &str, body: String) -> Result<(), KvError> {
        debug!("Uploading {} bytes for key {} to {}/{}", body.len(), key, self.config.bucket, path);
        let outcome = self.objects
            .put_object(PutObject::json_document(&self.config.bucket, path, body))
            .await?;
        debug!("Uploaded key {} (etag {:?})", key, outcome.etag);

        self.invalidate(key, path).await
    }

    async fn invalidate(&self, key: &str, path: &str) -> Result<(), KvError> {
        let request = InvalidationRequest::single_path(&self.config.distribution_id, format!("/{}", path));
        match self.invalidator.create_invalidation(request).await {
            Ok(()) => {
                info!("Cache invalidated for {}", key);
                Ok(())
            }
            Err(e) => {
                error!("Failed to invalidate cache for {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    /// Fetch `key` from the edge.
    ///
    /// Returns `None` both when the key does not exist and when the read
    /// fails; use [`KeyValueStore::lookup`] to tell the two apart.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).await.into_value()
    }

    /// Fetch `key` from the edge, keeping the reason of a miss
    pub async fn lookup(&self, key: &str) -> Lookup {
        let url = self.edge_url(key);
        match self.reader.fetch(&url).await {
            Ok(value) => Lookup::Found(value),
            Err(EdgeError::NotFound) => {
                info!("File not found: {}", key);
                Lookup::NotFound
            }
            Err(e) => {
                error!("Error fetching file {}: {}", url, e);
                Lookup::Unavailable(e.to_string())
            }
        }
    }
}
