//! Gateway configuration, read from `CHAINCALL_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chaincall_providers::public::{
    CLOUDFLARE_MAINNET, PUBLICNODE_MAINNET, PUBLICNODE_SEPOLIA, UNCONFIGURED_MARKER,
};
use chaincall_providers::{HttpClientConfig, ResolverConfig};

use crate::tracing_setup::LogConfig;

/// TestToken deployment used by the CLI demo.
pub const DEMO_CONTRACT_ADDRESS: &str = "0x294EdBDadcE4c435A093383EdA82a5f2E22CA0C1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Prefix every route is mounted under
    pub base_path: String,
    /// Endpoint for requests that carry no `rpcUrl`
    pub default_rpc_url: String,
    /// Substring marking a placeholder RPC URL
    pub unconfigured_marker: String,
    /// Endpoint substituted for placeholder URLs
    pub unconfigured_rpc_url: String,
    /// Endpoint used when the primary fails its liveness probe
    pub fallback_rpc_url: String,
    pub probe_timeout_ms: u64,
    pub call_timeout_ms: u64,
    /// Contract the CLI demo runs against
    pub demo_contract_address: String,
    pub log: LogConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 4000,
            base_path: "/api/v1".into(),
            default_rpc_url: PUBLICNODE_SEPOLIA.into(),
            unconfigured_marker: UNCONFIGURED_MARKER.into(),
            unconfigured_rpc_url: PUBLICNODE_MAINNET.into(),
            fallback_rpc_url: CLOUDFLARE_MAINNET.into(),
            probe_timeout_ms: 5_000,
            call_timeout_ms: 15_000,
            demo_contract_address: DEMO_CONTRACT_ADDRESS.into(),
            log: LogConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let d = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        Ok(Self {
            host: text("CHAINCALL_HOST", d.host),
            port: parse(&lookup, "CHAINCALL_PORT", d.port)?,
            base_path: text("CHAINCALL_BASE_PATH", d.base_path),
            default_rpc_url: text("CHAINCALL_DEFAULT_RPC", d.default_rpc_url),
            unconfigured_marker: text("CHAINCALL_UNCONFIGURED_MARKER", d.unconfigured_marker),
            unconfigured_rpc_url: text("CHAINCALL_UNCONFIGURED_RPC", d.unconfigured_rpc_url),
            fallback_rpc_url: text("CHAINCALL_FALLBACK_RPC", d.fallback_rpc_url),
            probe_timeout_ms: parse(&lookup, "CHAINCALL_PROBE_TIMEOUT_MS", d.probe_timeout_ms)?,
            call_timeout_ms: parse(&lookup, "CHAINCALL_CALL_TIMEOUT_MS", d.call_timeout_ms)?,
            demo_contract_address: text("CHAINCALL_DEMO_CONTRACT", d.demo_contract_address),
            log: LogConfig {
                level: text("CHAINCALL_LOG_LEVEL", d.log.level),
                json: parse(&lookup, "CHAINCALL_LOG_JSON", d.log.json)?,
                components: d.log.components,
            },
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            unconfigured_marker: self.unconfigured_marker.clone(),
            unconfigured_rpc_url: self.unconfigured_rpc_url.clone(),
            fallback_rpc_url: self.fallback_rpc_url.clone(),
            probe_timeout: self.probe_timeout(),
        }
    }

    /// Client settings for node connections. The per-request bound is the
    /// larger of the probe and call timeouts so neither is cut short.
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.call_timeout().max(self.probe_timeout()),
            ..HttpClientConfig::default()
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("Invalid {key}: '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_public_endpoints() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:4000");
        assert_eq!(config.default_rpc_url, "https://ethereum-sepolia.publicnode.com");
        assert_eq!(config.fallback_rpc_url, "https://cloudflare-eth.com");
        assert_eq!(config.call_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn env_overrides_apply() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("CHAINCALL_PORT", "8080"),
            ("CHAINCALL_FALLBACK_RPC", "https://fallback.example"),
            ("CHAINCALL_PROBE_TIMEOUT_MS", "250"),
            ("CHAINCALL_LOG_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.log.json);

        let resolver = config.resolver_config();
        assert_eq!(resolver.fallback_rpc_url, "https://fallback.example");
        assert_eq!(resolver.probe_timeout, Duration::from_millis(250));
    }

    #[test]
    fn client_timeout_follows_call_timeout() {
        let config = GatewayConfig::from_lookup(lookup(&[("CHAINCALL_CALL_TIMEOUT_MS", "40000")])).unwrap();
        assert_eq!(config.http_client_config().request_timeout, Duration::from_secs(40));

        let config = GatewayConfig::from_lookup(lookup(&[
            ("CHAINCALL_CALL_TIMEOUT_MS", "1000"),
            ("CHAINCALL_PROBE_TIMEOUT_MS", "7000"),
        ]))
        .unwrap();
        assert_eq!(config.http_client_config().request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn invalid_numbers_are_startup_errors() {
        let err = GatewayConfig::from_lookup(lookup(&[("CHAINCALL_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("CHAINCALL_PORT"));

        assert!(GatewayConfig::from_lookup(lookup(&[("CHAINCALL_CALL_TIMEOUT_MS", "-1")])).is_err());
    }
}
