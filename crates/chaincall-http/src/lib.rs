//! chaincall-http — reqwest-backed JSON-RPC transport.

pub mod client;

pub use client::{HttpClientConfig, HttpRpcClient};
