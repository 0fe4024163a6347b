//! JSON-RPC 2.0 wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

/// A single JSON-RPC parameter value.
pub type RpcParam = Value;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<RpcParam>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<RpcParam>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Geth: `execution reverted` with revert data.
    pub const EXECUTION_REVERTED: i64 = 3;
    /// Generic server error; geth and erigon also use it for bare reverts.
    pub const SERVER_ERROR: i64 = -32000;
    /// OpenEthereum / Nethermind VM execution error.
    pub const VM_EXECUTION_ERROR: i64 = -32015;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i64 = -32602;

    /// Revert bytes attached to the error, if any.
    ///
    /// Nodes disagree on where to put them: geth uses a bare hex string in
    /// `data`, others nest it as `data.data` or `data.originalError.data`.
    pub fn revert_data(&self) -> Option<Vec<u8>> {
        fn from_value(v: &Value) -> Option<Vec<u8>> {
            match v {
                Value::String(s) => {
                    let stripped = s.strip_prefix("0x")?;
                    hex::decode(stripped).ok()
                }
                Value::Object(map) => map
                    .get("data")
                    .and_then(from_value)
                    .or_else(|| map.get("originalError").and_then(from_value)),
                _ => None,
            }
        }
        self.data.as_ref().and_then(from_value)
    }

    /// Returns `true` if the node reported a failed contract execution.
    pub fn is_revert(&self) -> bool {
        matches!(
            self.code,
            Self::EXECUTION_REVERTED | Self::SERVER_ERROR | Self::VM_EXECUTION_ERROR
        ) || self.revert_data().is_some()
    }

    /// Reason string from a `execution reverted: <reason>` node message.
    pub fn reason_from_message(&self) -> Option<&str> {
        self.message
            .strip_prefix("execution reverted: ")
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a successful response (used by mock transports).
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: RpcId::Number(id),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response (used by mock transports).
    pub fn failure(id: u64, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: RpcId::Number(id),
            result: None,
            error: Some(error),
        }
    }

    /// Returns `true` if this is a successful response (has result, no error).
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.result.is_some()
    }

    /// Unwrap the result value or return an error.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(self.result.unwrap_or(Value::Null))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rpc_error(code: i64, message: &str, data: Option<Value>) -> JsonRpcError {
        JsonRpcError {
            code,
            message: message.into(),
            data,
        }
    }

    #[test]
    fn request_serialization() {
        let req = JsonRpcRequest::new(1, "eth_chainId", vec![]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"eth_chainId\""));
    }

    #[test]
    fn response_into_result_error() {
        let resp = JsonRpcResponse::failure(1, rpc_error(3, "execution reverted", None));
        assert!(!resp.is_ok());
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.code, 3);
    }

    #[test]
    fn revert_data_geth_style() {
        let err = rpc_error(3, "execution reverted", Some(json!("0x08c379a0")));
        assert_eq!(err.revert_data().unwrap(), vec![0x08, 0xc3, 0x79, 0xa0]);
        assert!(err.is_revert());
    }

    #[test]
    fn revert_data_nested() {
        let err = rpc_error(
            -32603,
            "internal error",
            Some(json!({ "originalError": { "data": "0x4e487b71" } })),
        );
        assert_eq!(err.revert_data().unwrap(), vec![0x4e, 0x48, 0x7b, 0x71]);
        assert!(err.is_revert());
    }

    #[test]
    fn method_not_found_is_not_revert() {
        let err = rpc_error(-32601, "method not found", None);
        assert!(!err.is_revert());
        assert!(err.revert_data().is_none());
    }

    #[test]
    fn reason_from_node_message() {
        let err = rpc_error(-32000, "execution reverted: Pausable: paused", None);
        assert_eq!(err.reason_from_message(), Some("Pausable: paused"));
        let bare = rpc_error(-32000, "execution reverted", None);
        assert_eq!(bare.reason_from_message(), None);
    }
}
