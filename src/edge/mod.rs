//! Edge reads
//!
//! Documents are read back through the public content-delivery URL rather
//! than from the bucket, so reads are served from the edge cache.

pub mod http_reader;
pub mod mock_reader;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::json::parse_value;

/// Why an edge fetch did not yield a document
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EdgeError {
    /// The edge answered 404
    #[error("not found")]
    NotFound,
    /// The edge answered with another non-success status
    #[error("unexpected status {0}")]
    Status(u16),
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),
    /// The body is not valid JSON
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Trait defining the edge read interface
#[async_trait]
pub trait EdgeReader: Send + Sync {
    /// GET `url` and parse the body as JSON
    async fn fetch(&self, url: &str) -> Result<Value, EdgeError>;
}

/// Map a response status and body to the fetch result.
///
/// 404 is the only distinguished status; other non-2xx statuses are failures.
pub fn decode_response(status: u16, body: &[u8]) -> Result<Value, EdgeError> {
    match status {
        404 => Err(EdgeError::NotFound),
        200..=299 => parse_value(body).map_err(|e| EdgeError::Decode(e.to_string())),
        other => Err(EdgeError::Status(other)),
    }
}
