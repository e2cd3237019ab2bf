//! HTTP edge reader built on reqwest

use crate::edge::{decode_response, EdgeError, EdgeReader};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

/// Reads documents with plain HTTP GETs
#[derive(Clone, Default)]
pub struct HttpEdgeReader {
    client: reqwest::Client,
}

impl HttpEdgeReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, timeouts)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EdgeReader for HttpEdgeReader {
    async fn fetch(&self, url: &str) -> Result<Value, EdgeError> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| EdgeError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        debug!("Edge GET {} answered {}", url, status);

        let body = response
            .bytes()
            .await
            .map_err(|e| EdgeError::Transport(e.to_string()))?;
        decode_response(status, &body)
    }
}
