//! Mock implementation of ObjectStore for testing

use crate::storage::{ObjectStore, PutObject, PutObjectOutcome, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use log::info;

/// Mock implementation of ObjectStore for testing
pub struct MockObjectStore {
    // In-memory storage: bucket -> key -> last upload
    objects: Arc<Mutex<HashMap<String, HashMap<String, PutObject>>>>,
    uploads: Arc<Mutex<usize>>,
    failing: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            uploads: Arc::new(Mutex::new(0)),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following upload fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get the last upload stored at `bucket`/`key`
    pub fn object(&self, bucket: &str, key: &str) -> Option<PutObject> {
        let objects = self.objects.lock().unwrap();
        objects.get(bucket).and_then(|keys| keys.get(key)).cloned()
    }

    /// Get the stored body at `bucket`/`key` as text
    pub fn body(&self, bucket: &str, key: &str) -> Option<String> {
        self.object(bucket, key)
            .map(|put| String::from_utf8_lossy(&put.body).into_owned())
    }

    /// Get the number of objects in a bucket
    pub fn object_count(&self, bucket: &str) -> usize {
        let objects = self.objects.lock().unwrap();
        objects.get(bucket).map(|keys| keys.len()).unwrap_or(0)
    }

    /// Get the number of successful uploads, overwrites included
    pub fn upload_count(&self) -> usize {
        *self.uploads.lock().unwrap()
    }

    /// Check if an object exists
    pub fn object_exists(&self, bucket: &str, key: &str) -> bool {
        self.object(bucket, key).is_some()
    }

    /// Clear all data from the store
    pub fn clear(&self) {
        self.objects.lock().unwrap().clear();
        *self.uploads.lock().unwrap() = 0;
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(&self, request: PutObject) -> Result<PutObjectOutcome, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(format!(
                "mock upload rejected for {}/{}", request.bucket, request.key
            )));
        }
        if request.bucket.is_empty() || request.key.is_empty() {
            return Err(StorageError::InvalidRequest("bucket and key are required".to_string()));
        }

        // S3 reports the hex MD5 of a single-part upload as its ETag
        let etag = format!("\"{}\"", hex::encode(md5::compute(&request.body).0));

        info!("Mock: Stored {} bytes at {}/{}", request.body.len(), request.bucket, request.key);
        let mut objects = self.objects.lock().unwrap();
        objects
            .entry(request.bucket.clone())
            .or_insert_with(HashMap::new)
            .insert(request.key.clone(), request);
        *self.uploads.lock().unwrap() += 1;

        Ok(PutObjectOutcome { etag: Some(etag) })
    }
}
