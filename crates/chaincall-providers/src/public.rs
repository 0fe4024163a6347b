//! Public / community RPC endpoints.
//!
//! These are free, no-API-key endpoints suitable for development and demos.
//! Rate limits are lower and reliability may vary.

/// PublicNode Ethereum mainnet.
pub const PUBLICNODE_MAINNET: &str = "https://ethereum.publicnode.com";

/// PublicNode Sepolia testnet.
pub const PUBLICNODE_SEPOLIA: &str = "https://ethereum-sepolia.publicnode.com";

/// Cloudflare Ethereum gateway (Ethereum mainnet only).
pub const CLOUDFLARE_MAINNET: &str = "https://cloudflare-eth.com";

/// Placeholder fragment found in copy-pasted provider URLs that were never
/// filled in (e.g. `https://mainnet.infura.io/v3/your-api-key`).
pub const UNCONFIGURED_MARKER: &str = "your-api-key";

/// A named public endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicEndpoint {
    pub name: &'static str,
    pub chain_id: u64,
    pub url: &'static str,
}

/// Built-in public endpoints, in preference order.
pub fn known_endpoints() -> &'static [PublicEndpoint] {
    const ENDPOINTS: &[PublicEndpoint] = &[
        PublicEndpoint { name: "publicnode-mainnet", chain_id: 1, url: PUBLICNODE_MAINNET },
        PublicEndpoint { name: "publicnode-sepolia", chain_id: 11_155_111, url: PUBLICNODE_SEPOLIA },
        PublicEndpoint { name: "cloudflare-mainnet", chain_id: 1, url: CLOUDFLARE_MAINNET },
    ];
    ENDPOINTS
}

/// Look up a built-in endpoint by name.
pub fn by_name(name: &str) -> Option<&'static PublicEndpoint> {
    known_endpoints().iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_finds_sepolia() {
        let e = by_name("publicnode-sepolia").unwrap();
        assert_eq!(e.chain_id, 11_155_111);
        assert_eq!(e.url, PUBLICNODE_SEPOLIA);
    }

    #[test]
    fn by_name_unknown() {
        assert!(by_name("infura").is_none());
    }
}
