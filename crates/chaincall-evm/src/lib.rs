//! chaincall-evm — read-only contract invocation over an arbitrary ABI.
//!
//! # Pipeline
//!
//! 1. [`ContractBinding`] parses the caller's ABI and maps function names
//!    (or full signatures) to their overloads.
//! 2. [`coerce`] turns JSON arguments into typed ABI values.
//! 3. [`ContractInvoker`] encodes the call, performs `eth_call` and
//!    classifies failures into the gateway taxonomy.
//! 4. [`normalizer`] turns the decoded return values into JSON-safe output.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chaincall_evm::ContractInvoker;
//! use chaincall_providers::{HttpClientConfig, ProviderResolver, ResolverConfig};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), chaincall_core::GatewayError> {
//! let handle = ProviderResolver::http(ResolverConfig::default(), HttpClientConfig::default())
//!     .resolve("https://ethereum.publicnode.com")
//!     .await?;
//! let abi = json!(["function symbol() view returns (string)"]);
//! let symbol = ContractInvoker::default()
//!     .invoke(&handle, "0xdAC17F958D2ee523a2206206994597C13D831ec7", &abi, "symbol", &[])
//!     .await?;
//! assert_eq!(symbol, json!("USDT"));
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod coerce;
pub mod invoker;
pub mod normalizer;
pub mod revert;

pub use binding::ContractBinding;
pub use invoker::ContractInvoker;
pub use normalizer::NormalizedValue;
