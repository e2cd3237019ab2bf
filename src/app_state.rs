//! Application State Management
//!
//! This module provides the application state that contains the key-value
//! store and its collaborators, following the dependency injection pattern.

use std::sync::Arc;
use log::info;

use crate::config::{AppConfig, Backend, Credentials};
use crate::edge::{EdgeReader, http_reader::HttpEdgeReader, mock_reader::MockEdgeReader};
use crate::error::ConfigError;
use crate::invalidation::{CacheInvalidator, cloudfront::CloudFrontInvalidator, mock_invalidator::MockInvalidator};
use crate::service::KeyValueStore;
use crate::storage::{ObjectStore, s3_store::S3ObjectStore, mock_store::MockObjectStore};

/// Application state containing the store and its configuration
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KeyValueStore>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// The AWS backend needs `credentials`; the mock backend ignores them.
    pub fn from_config(config: AppConfig, credentials: Option<&Credentials>) -> Result<Self, ConfigError> {
        info!("Initializing application state with configuration");
        config.validate()?;

        let store_config = &config.store;
        let (objects, invalidator, reader): (Arc<dyn ObjectStore>, Arc<dyn CacheInvalidator>, Arc<dyn EdgeReader>) =
            match config.backend {
                Backend::Aws => {
                    let credentials = credentials.ok_or(ConfigError::Missing("credentials"))?;
                    info!("Using AWS backend: region={}, bucket={}, distribution={}, edge={}",
                          store_config.region, store_config.bucket,
                          store_config.distribution_id, store_config.edge_base_url);
                    let objects: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(&store_config.region, credentials));
                    let invalidator: Arc<dyn CacheInvalidator> =
                        Arc::new(CloudFrontInvalidator::new(&store_config.region, credentials));
                    let reader: Arc<dyn EdgeReader> = Arc::new(HttpEdgeReader::new());
                    (objects, invalidator, reader)
                }
                Backend::Mock => {
                    info!("Using mock backend");
                    let mock_objects = Arc::new(MockObjectStore::new());
                    let reader: Arc<dyn EdgeReader> = Arc::new(MockEdgeReader::mirroring(
                        Arc::clone(&mock_objects),
                        &store_config.bucket,
                        &store_config.edge_base_url,
                    ));
                    let invalidator: Arc<dyn CacheInvalidator> = Arc::new(MockInvalidator::new());
                    let objects: Arc<dyn ObjectStore> = mock_objects;
                    (objects, invalidator, reader)
                }
            };

        Ok(Self::with_backends(config, objects, invalidator, reader))
    }

    /// Create application state around injected collaborators
    pub fn with_backends(
        config: AppConfig,
        objects: Arc<dyn ObjectStore>,
        invalidator: Arc<dyn CacheInvalidator>,
        reader: Arc<dyn EdgeReader>,
    ) -> Self {
        let store = Arc::new(KeyValueStore::new(config.store.clone(), objects, invalidator, reader));
        info!("Application state initialized successfully");
        Self { store, config }
    }

    /// Create application state for testing with mock backends
    pub fn new_for_testing() -> Self {
        let mut config = AppConfig::default();
        config.backend = Backend::Mock;
        config.store.bucket = "test-bucket".to_string();
        config.store.edge_base_url = "https://cdn.test".to_string();
        config.store.distribution_id = "TESTDIST".to_string();

        let objects = Arc::new(MockObjectStore::new());
        let reader = Arc::new(MockEdgeReader::mirroring(
            Arc::clone(&objects),
            &config.store.bucket,
            &config.store.edge_base_url,
        ));
        Self::with_backends(config, objects, Arc::new(MockInvalidator::new()), reader)
    }
}
