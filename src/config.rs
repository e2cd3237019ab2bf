//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting YAML configuration files with sensible defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use log::{debug, info, warn};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "EDGE_KV_CONFIG";
/// Environment variable overriding the configured backend
pub const BACKEND_VAR: &str = "EDGE_KV_BACKEND";
/// Environment variable holding the access key id
pub const ACCESS_KEY_VAR: &str = "S3_KEY";
/// Environment variable holding the secret access key
pub const SECRET_KEY_VAR: &str = "S3_SECRET";

/// Folder every document lives under, in the bucket and on the edge
pub const DEFAULT_FOLDER: &str = "corejson";

/// Collaborator backend types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// S3 + CloudFront + HTTP edge reads
    #[default]
    Aws,
    /// In-memory collaborators
    Mock,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" | "s3" => Ok(Backend::Aws),
            "mock" => Ok(Backend::Mock),
            _ => Err(format!("Unknown backend: {}", s))
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Key-value store configuration
    pub store: StoreConfig,
    /// Collaborator backend
    pub backend: Backend,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Maximum request body size in bytes
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9710,
            workers: 4,
            max_payload_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Settings of one key-value store instance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// AWS region of the bucket
    pub region: String,
    /// Bucket holding the documents
    pub bucket: String,
    /// Public base URL of the CDN distribution, without trailing slash
    pub edge_base_url: String,
    /// CDN distribution to invalidate on writes
    pub distribution_id: String,
    /// Folder prefix of every document
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            bucket: String::new(),
            edge_base_url: String::new(),
            distribution_id: String::new(),
            folder: default_folder(),
        }
    }
}

impl StoreConfig {
    pub fn new(region: &str, bucket: &str, edge_base_url: &str, distribution_id: &str) -> Self {
        Self {
            region: region.to_string(),
            bucket: bucket.to_string(),
            edge_base_url: edge_base_url.to_string(),
            distribution_id: distribution_id.to_string(),
            folder: default_folder(),
        }
    }

    /// Check that every required setting is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Missing("store.region"));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Missing("store.bucket"));
        }
        if self.edge_base_url.trim().is_empty() {
            return Err(ConfigError::Missing("store.edge_base_url"));
        }
        if self.distribution_id.trim().is_empty() {
            return Err(ConfigError::Missing("store.distribution_id"));
        }
        if self.folder.is_empty() || self.folder.contains('/') {
            return Err(ConfigError::Invalid(format!("store.folder must be one path segment, got {:?}", self.folder)));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Path to log configuration file
    pub config_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            config_file: "server_log.yaml".to_string(),
        }
    }
}

/// Credentials shared by the object store and invalidation clients
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        }
    }

    /// Read the credentials from `S3_KEY` and `S3_SECRET`.
    ///
    /// Called once by the application at startup; library code takes
    /// `Credentials` explicitly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let read = |name: &'static str| match env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::Missing(name)),
        };
        let access_key_id = read(ACCESS_KEY_VAR)?;
        let secret_access_key = read(SECRET_KEY_VAR)?;
        debug!("Loaded credentials for access key {}", mask(&access_key_id));
        Ok(Self { access_key_id, secret_access_key })
    }
}

/// Keep only the last four characters of an access key id
fn mask(key: &str) -> String {
    let start = key.len().saturating_sub(4);
    match key.get(start..) {
        Some(tail) if start > 0 => format!("****{}", tail),
        _ => "****".to_string(),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &mask(&self.access_key_id))
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `EDGE_KV_CONFIG` or `config.yaml`, use
    /// defaults if not found, then apply the `EDGE_KV_BACKEND` override
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(backend_str) = env::var(BACKEND_VAR) {
            match backend_str.parse::<Backend>() {
                Ok(backend) => {
                    info!("Using backend from environment: {:?}", backend);
                    self.backend = backend;
                }
                Err(e) => {
                    warn!("Invalid backend in environment: {}. Keeping {:?}.", e, self.backend);
                }
            }
        }
    }

    /// Validate the settings the configured backend needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == 0 {
            return Err(ConfigError::Invalid("server.workers must be at least 1".to_string()));
        }
        self.store.validate()
    }
}
