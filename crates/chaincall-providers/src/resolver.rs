//! Provider resolution with silent fallback.
//!
//! `resolve()` always hands back a usable [`ProviderHandle`] for
//! connectivity problems: an unconfigured URL is swapped for a public
//! endpoint, and a primary that fails its liveness probe is replaced by the
//! configured fallback. Each substitution emits a `warn!` event; none of them
//! reaches the caller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use chaincall_core::error::{GatewayError, TransportError};
use chaincall_core::transport::RpcTransport;
use chaincall_http::{HttpClientConfig, HttpRpcClient};

use crate::public::{CLOUDFLARE_MAINNET, PUBLICNODE_MAINNET, UNCONFIGURED_MARKER};

/// Builds a transport bound to one endpoint URL.
///
/// The resolver goes through this seam for every connection it opens, so
/// tests can count and script connections without a network.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>, TransportError>;
}

/// Production connector: one fresh [`HttpRpcClient`] per call.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: HttpClientConfig,
}

impl HttpConnector {
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>, TransportError> {
        let client = HttpRpcClient::new(url, self.config.clone())?;
        Ok(Arc::new(client))
    }
}

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Substring marking a placeholder URL that was never filled in.
    pub unconfigured_marker: String,
    /// Endpoint used instead of a placeholder URL.
    pub unconfigured_rpc_url: String,
    /// Endpoint used when the primary fails its liveness probe.
    pub fallback_rpc_url: String,
    /// Upper bound for the liveness probe.
    pub probe_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            unconfigured_marker: UNCONFIGURED_MARKER.into(),
            unconfigured_rpc_url: PUBLICNODE_MAINNET.into(),
            fallback_rpc_url: CLOUDFLARE_MAINNET.into(),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// A live connection to one node, valid for a single request.
#[derive(Clone)]
pub struct ProviderHandle {
    endpoint: String,
    chain_id: Option<u64>,
    fallback: bool,
    transport: Arc<dyn RpcTransport>,
}

impl ProviderHandle {
    /// Wrap an already-built transport (no probe is performed).
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            endpoint: transport.url().to_string(),
            chain_id: None,
            fallback: false,
            transport,
        }
    }

    /// URL the handle is bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Chain id reported by the liveness probe, if it ran.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// `true` when the requested endpoint was replaced by the fallback.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn transport(&self) -> &dyn RpcTransport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("endpoint", &self.endpoint)
            .field("chain_id", &self.chain_id)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Turns a requested RPC URL into a [`ProviderHandle`].
pub struct ProviderResolver {
    connector: Arc<dyn Connector>,
    config: ResolverConfig,
}

impl ProviderResolver {
    pub fn new(connector: Arc<dyn Connector>, config: ResolverConfig) -> Self {
        Self { connector, config }
    }

    /// Resolver backed by [`HttpConnector`] using `client` for every connection.
    pub fn http(config: ResolverConfig, client: HttpClientConfig) -> Self {
        Self::new(Arc::new(HttpConnector::new(client)), config)
    }

    /// Resolve `rpc_url` to a probed handle, or to the fallback endpoint.
    ///
    /// Connectivity failures of the primary never surface here. The only
    /// error is a fallback URL that cannot even be turned into a transport,
    /// which is a configuration problem.
    pub async fn resolve(&self, rpc_url: &str) -> Result<ProviderHandle, GatewayError> {
        let candidate = self.substitute_unconfigured(rpc_url);

        match self.probe(candidate).await {
            Ok(handle) => {
                tracing::debug!(
                    endpoint = %handle.endpoint,
                    chain_id = ?handle.chain_id,
                    "provider connected"
                );
                Ok(handle)
            }
            Err(reason) => {
                tracing::warn!(
                    primary = %candidate,
                    fallback = %self.config.fallback_rpc_url,
                    reason = %reason,
                    "primary RPC endpoint failed liveness probe, using fallback"
                );
                self.fallback_handle().await
            }
        }
    }

    fn substitute_unconfigured<'a>(&'a self, rpc_url: &'a str) -> &'a str {
        let marker = self.config.unconfigured_marker.as_str();
        if !marker.is_empty() && rpc_url.contains(marker) {
            tracing::info!(
                requested = %rpc_url,
                substitute = %self.config.unconfigured_rpc_url,
                "RPC URL is unconfigured, using public endpoint"
            );
            &self.config.unconfigured_rpc_url
        } else {
            rpc_url
        }
    }

    async fn probe(&self, url: &str) -> Result<ProviderHandle, TransportError> {
        let transport = self.connector.connect(url).await?;
        let timeout = self.config.probe_timeout;
        let chain_id = tokio::time::timeout(timeout, transport.request("eth_chainId", vec![]))
            .await
            .map_err(|_| TransportError::Timeout {
                ms: timeout.as_millis() as u64,
            })??;

        Ok(ProviderHandle {
            endpoint: url.to_string(),
            chain_id: Some(parse_chain_id(&chain_id)?),
            fallback: false,
            transport,
        })
    }

    async fn fallback_handle(&self) -> Result<ProviderHandle, GatewayError> {
        let url = &self.config.fallback_rpc_url;
        let transport = self.connector.connect(url).await.map_err(|e| {
            tracing::error!(fallback = %url, error = %e, "fallback RPC endpoint is unusable");
            GatewayError::from(e)
        })?;
        Ok(ProviderHandle {
            endpoint: url.clone(),
            chain_id: None,
            fallback: true,
            transport,
        })
    }
}

/// Parse an `eth_chainId` result (`"0x1"`).
fn parse_chain_id(value: &Value) -> Result<u64, TransportError> {
    let s = value
        .as_str()
        .ok_or_else(|| TransportError::Other(format!("eth_chainId returned {value}")))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| TransportError::Other(format!("invalid chain id '{s}': {e}")))
}
