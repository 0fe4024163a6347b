//! Request/response data model for a single contract read.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// One read-only contract invocation, as received from a caller.
///
/// Everything here lives for exactly one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallRequest {
    /// Contract address (taken from the URL path on the HTTP surface).
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub function_name: String,
    /// ABI fragments in any accepted form (array, object, JSON text,
    /// human-readable signatures).
    #[serde(default)]
    pub abi: Option<Value>,
    /// Positional call arguments.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Node endpoint; the gateway default applies when absent.
    #[serde(default)]
    pub rpc_url: Option<String>,
}

impl ContractCallRequest {
    pub fn new(
        address: impl Into<String>,
        function_name: impl Into<String>,
        abi: Value,
        args: Vec<Value>,
    ) -> Self {
        Self {
            address: address.into(),
            function_name: function_name.into(),
            abi: Some(abi),
            args,
            rpc_url: None,
        }
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Check required fields in order: address, function name, ABI.
    ///
    /// The first missing field determines the error. Must run before any
    /// network activity.
    pub fn validate(&self) -> Result<(), GatewayError> {
        validate_call_fields(&self.address, &self.function_name, self.abi.as_ref())
    }
}

/// Required-field check shared by the request model and the invoker.
pub fn validate_call_fields(
    address: &str,
    function_name: &str,
    abi: Option<&Value>,
) -> Result<(), GatewayError> {
    if address.trim().is_empty() {
        return Err(GatewayError::validation("Smart contract address is required"));
    }
    if function_name.trim().is_empty() {
        return Err(GatewayError::validation("Function name is required"));
    }
    if abi_is_empty(abi) {
        return Err(GatewayError::validation("Contract ABI is required"));
    }
    Ok(())
}

/// Null, `false`, zero and empty containers all count as "no ABI".
fn abi_is_empty(abi: Option<&Value>) -> bool {
    match abi {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCallResponse {
    pub success: bool,
    pub contract_address: String,
    pub function_name: String,
    pub arguments: Vec<Value>,
    pub result: Value,
    pub timestamp: String,
}

impl ContractCallResponse {
    pub fn new(request: ContractCallRequest, result: Value) -> Self {
        Self {
            success: true,
            contract_address: request.address,
            function_name: request.function_name,
            arguments: request.args,
            result,
            timestamp: iso_timestamp(),
        }
    }
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
