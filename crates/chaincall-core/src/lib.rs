//! chaincall-core — foundation traits and types for ChainCall.
//!
//! # Overview
//!
//! ChainCall is a read-only smart-contract invocation gateway: given a
//! contract address, an ABI fragment, a function name and arguments, it
//! performs an `eth_call` against a remote node and returns a JSON-safe
//! result. The core crate defines:
//!
//! - [`RpcTransport`]: the async trait every node transport implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types
//! - [`TransportError`]: structured transport failures
//! - [`GatewayError`] / [`ErrorCode`]: the API error taxonomy
//! - [`ContractCallRequest`] / [`ContractCallResponse`]: the data model

pub mod call;
pub mod error;
pub mod request;
pub mod transport;

pub use call::{iso_timestamp, validate_call_fields, ContractCallRequest, ContractCallResponse};
pub use error::{ErrorCode, GatewayError, TransportError};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId, RpcParam};
pub use transport::RpcTransport;
