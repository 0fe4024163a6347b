//! chaincall-providers — endpoint profiles and provider resolution.
//!
//! # Quick start
//! ```rust,no_run
//! use chaincall_providers::{HttpClientConfig, ProviderResolver, ResolverConfig};
//!
//! # async fn run() -> Result<(), chaincall_core::GatewayError> {
//! let resolver = ProviderResolver::http(ResolverConfig::default(), HttpClientConfig::default());
//! let handle = resolver.resolve("https://ethereum-sepolia.publicnode.com").await?;
//! println!("bound to {} (fallback: {})", handle.endpoint(), handle.is_fallback());
//! # Ok(())
//! # }
//! ```

pub mod public;
pub mod resolver;

pub use chaincall_http::HttpClientConfig;
pub use resolver::{Connector, HttpConnector, ProviderHandle, ProviderResolver, ResolverConfig};
