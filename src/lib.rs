// src/lib.rs

pub mod storage;
pub mod invalidation;
pub mod edge;
pub mod service;
pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod json;
pub mod logging;

pub use config::{Credentials, StoreConfig};
pub use error::KvError;
pub use service::{KeyValueStore, Lookup, Payload};
