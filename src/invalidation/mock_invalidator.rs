//! Mock implementation of CacheInvalidator for testing

use crate::invalidation::{CacheInvalidator, InvalidationError, InvalidationRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use log::info;

/// Records every invalidation it receives
pub struct MockInvalidator {
    requests: Arc<Mutex<Vec<InvalidationRequest>>>,
    failing: AtomicBool,
}

impl MockInvalidator {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following invalidation fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All accepted requests, oldest first
    pub fn requests(&self) -> Vec<InvalidationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<InvalidationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockInvalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInvalidator for MockInvalidator {
    async fn create_invalidation(&self, request: InvalidationRequest) -> Result<(), InvalidationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(InvalidationError::Backend(format!(
                "mock invalidation rejected for distribution {}", request.distribution_id
            )));
        }
        if request.paths.is_empty() {
            return Err(InvalidationError::InvalidRequest("at least one path is required".to_string()));
        }

        info!("Mock: Invalidated {:?} on distribution {}", request.paths, request.distribution_id);
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}
