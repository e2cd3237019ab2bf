//! Error types surfaced by the key-value facade and its configuration

use crate::invalidation::InvalidationError;
use crate::storage::StorageError;
use thiserror::Error;

/// Failure of a write through the key-value facade.
///
/// Upload and invalidation failures share one message so callers see a
/// single "write failed" condition; the cause stays reachable as the source.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("failed to upload file or invalidate cache: {0}")]
    Upload(#[from] StorageError),
    #[error("failed to upload file or invalidate cache: {0}")]
    Invalidation(#[from] InvalidationError),
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting: {0}")]
    Invalid(String),
}
