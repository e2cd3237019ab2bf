//! Mock implementation of EdgeReader for testing

use crate::edge::{decode_response, EdgeError, EdgeReader};
use crate::storage::mock_store::MockObjectStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use log::info;

struct Origin {
    store: Arc<MockObjectStore>,
    bucket: String,
    base_url: String,
}

/// Serves canned responses, optionally falling back to the contents of a
/// [`MockObjectStore`] as if the edge had already been invalidated.
pub struct MockEdgeReader {
    responses: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    origin: Option<Origin>,
    unreachable: AtomicBool,
    fetched: Mutex<Vec<String>>,
}

impl MockEdgeReader {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            origin: None,
            unreachable: AtomicBool::new(false),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Serve `<base_url>/<object key>` from what `store` holds in `bucket`
    pub fn mirroring(store: Arc<MockObjectStore>, bucket: &str, base_url: &str) -> Self {
        Self {
            origin: Some(Origin {
                store,
                bucket: bucket.to_string(),
                base_url: base_url.to_string(),
            }),
            ..Self::new()
        }
    }

    /// Answer GETs on `url` with `status` and `body`
    pub fn serve(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.responses.lock().unwrap().insert(url.to_string(), (status, body.into()));
    }

    /// Fail every following fetch with a transport error (or stop failing)
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// URLs fetched so far, oldest first
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    fn from_origin(&self, url: &str) -> Option<(u16, Vec<u8>)> {
        let origin = self.origin.as_ref()?;
        let key = url.strip_prefix(&origin.base_url)?.strip_prefix('/')?;
        Some(match origin.store.object(&origin.bucket, key) {
            Some(put) => (200, put.body.to_vec()),
            None => (404, Vec::new()),
        })
    }
}

impl Default for MockEdgeReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdgeReader for MockEdgeReader {
    async fn fetch(&self, url: &str) -> Result<Value, EdgeError> {
        self.fetched.lock().unwrap().push(url.to_string());
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(EdgeError::Transport(format!("mock edge unreachable: {}", url)));
        }

        let canned = self.responses.lock().unwrap().get(url).cloned();
        let (status, body) = canned
            .or_else(|| self.from_origin(url))
            .unwrap_or((404, Vec::new()));
        info!("Mock: Edge GET {} answered {}", url, status);
        decode_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ObjectStore, PutObject};
    use serde_json::json;

    #[actix_web::test]
    async fn test_mock_edge_reader_canned_responses() {
        let reader = MockEdgeReader::new();
        reader.serve("https://cdn.test/corejson/a.json", 200, r#"{"a":1}"#);
        reader.serve("https://cdn.test/corejson/b.json", 500, "boom");

        assert_eq!(reader.fetch("https://cdn.test/corejson/a.json").await, Ok(json!({"a": 1})));
        assert_eq!(reader.fetch("https://cdn.test/corejson/b.json").await, Err(EdgeError::Status(500)));
        assert_eq!(reader.fetch("https://cdn.test/corejson/c.json").await, Err(EdgeError::NotFound));
        assert_eq!(reader.fetched_urls().len(), 3);

        reader.set_unreachable(true);
        assert!(matches!(
            reader.fetch("https://cdn.test/corejson/a.json").await,
            Err(EdgeError::Transport(_))
        ));
    }

    #[actix_web::test]
    async fn test_mock_edge_reader_mirrors_store() {
        let store = Arc::new(MockObjectStore::new());
        let reader = MockEdgeReader::mirroring(Arc::clone(&store), "bucket", "https://cdn.test");

        assert_eq!(reader.fetch("https://cdn.test/corejson/a.json").await, Err(EdgeError::NotFound));

        store
            .put_object(PutObject::json_document("bucket", "corejson/a.json", "[1,2]"))
            .await
            .unwrap();
        assert_eq!(reader.fetch("https://cdn.test/corejson/a.json").await, Ok(json!([1, 2])));
        assert_eq!(reader.fetch("https://other.test/corejson/a.json").await, Err(EdgeError::NotFound));
    }
}
