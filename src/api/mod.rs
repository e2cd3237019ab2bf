//! HTTP API over the key-value store

pub mod handlers;

use actix_web::http::StatusCode;
use actix_web::{web, ResponseError};

use crate::error::KvError;

pub use handlers::{get_value, health, lookup_value, put_value};

impl ResponseError for KvError {
    fn status_code(&self) -> StatusCode {
        match self {
            KvError::Upload(_) | KvError::Invalidation(_) => StatusCode::BAD_GATEWAY,
            KvError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Register every route of the API
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(lookup_value)
        .service(get_value)
        .service(put_value);
}
