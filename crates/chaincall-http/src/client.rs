//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! Every request is bounded by `request_timeout`; an elapsed bound is
//! reported as [`TransportError::Timeout`] rather than a generic HTTP error.

use async_trait::async_trait;
use std::time::Duration;

use chaincall_core::error::TransportError;
use chaincall_core::request::{JsonRpcRequest, JsonRpcResponse};
use chaincall_core::transport::RpcTransport;

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP JSON-RPC client bound to a single endpoint.
#[derive(Debug)]
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    ///
    /// Only `http`/`https` URLs are accepted.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url).map_err(|e| TransportError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl {
                url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url,
            http,
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, HttpClientConfig::default())
    }

    fn timeout_error(&self) -> TransportError {
        TransportError::Timeout {
            ms: self.request_timeout.as_millis() as u64,
        }
    }

    fn map_reqwest(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            self.timeout_error()
        } else if e.is_decode() {
            TransportError::Other(format!("invalid JSON-RPC response: {e}"))
        } else {
            TransportError::Http(e.to_string())
        }
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            // Some providers answer reverts with HTTP 4xx/5xx and a JSON-RPC
            // error body; keep those as RPC errors.
            if let Ok(parsed) = serde_json::from_str::<JsonRpcResponse>(&body) {
                if parsed.error.is_some() {
                    return Ok(parsed);
                }
            }
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| self.map_reqwest(e))
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        tracing::debug!(url = %self.url, method = %req.method, "sending JSON-RPC request");
        match tokio::time::timeout(self.request_timeout, self.send_once(&req)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    url = %self.url,
                    method = %req.method,
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "JSON-RPC request timed out"
                );
                Err(self.timeout_error())
            }
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}
