// Key-value request handlers
use actix_web::{get, put, web, Error, HttpResponse};
use log::{debug, warn};
use serde_json::json;

use crate::app_state::AppState;
use crate::service::Lookup;

fn log_context(op: &str, key: &str) {
    log_mdc::insert("op", op);
    log_mdc::insert("key", key);
}

/// Store the request body under `key`
/// Handles requests like: PUT /kv/{key}
#[put("/kv/{key}")]
pub async fn put_value(
    path: web::Path<String>,
    body: web::Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let key = path.into_inner();
    log_context("set", &key);
    debug!("PUT key={}, size={}", key, body.len());

    // An empty body is the empty string, stored as ""
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(e) => {
            warn!("Payload for key {} is not UTF-8: {}", key, e);
            return Ok(HttpResponse::BadRequest().body("Payload must be UTF-8 text"));
        }
    };

    app_state.store.set(&key, text).await?;
    Ok(HttpResponse::Ok().json(json!({
        "key": key,
        "path": app_state.store.storage_path(&key),
    })))
}

/// Read `key` through the edge; a miss of any kind is a 404 with `null`
/// Handles requests like: GET /kv/{key}
#[get("/kv/{key}")]
pub async fn get_value(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let key = path.into_inner();
    log_context("get", &key);

    match app_state.store.get(&key).await {
        Some(value) => HttpResponse::Ok().json(value),
        None => HttpResponse::NotFound().json(serde_json::Value::Null),
    }
}

/// Read `key` through the edge and report why a read missed
/// Handles requests like: GET /kv/{key}/lookup
#[get("/kv/{key}/lookup")]
pub async fn lookup_value(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let key = path.into_inner();
    log_context("lookup", &key);

    let body = match app_state.store.lookup(&key).await {
        Lookup::Found(value) => json!({ "status": "found", "value": value }),
        Lookup::NotFound => json!({ "status": "not_found" }),
        Lookup::Unavailable(reason) => json!({ "status": "unavailable", "reason": reason }),
    };
    HttpResponse::Ok().json(body)
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
