//! Read-only contract invocation: bind → coerce → `eth_call` → decode.

use std::time::Duration;

use alloy_core::dyn_abi::{FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Address;
use serde_json::{json, Value};

use chaincall_core::call::validate_call_fields;
use chaincall_core::error::{GatewayError, TransportError};
use chaincall_core::request::JsonRpcError;
use chaincall_providers::ProviderHandle;

use crate::binding::ContractBinding;
use crate::coerce::coerce_args;
use crate::normalizer::normalize_outputs;
use crate::revert::decode_revert_reason;

/// Executes one read-only call per `invoke()`.
///
/// Holds no per-call state: the ABI, the provider and the arguments all
/// arrive with the call and are dropped when it returns.
#[derive(Debug, Clone)]
pub struct ContractInvoker {
    call_timeout: Duration,
}

impl Default for ContractInvoker {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(15),
        }
    }
}

impl ContractInvoker {
    pub fn new(call_timeout: Duration) -> Self {
        Self { call_timeout }
    }

    /// Call `function_name` on `address` with positional `args`.
    ///
    /// Everything that can be checked locally (required fields, ABI shape,
    /// function lookup, address, argument types) is checked before the node
    /// is contacted. Exactly one `eth_call` is made on success paths that
    /// reach the network.
    pub async fn invoke(
        &self,
        handle: &ProviderHandle,
        address: &str,
        abi: &Value,
        function_name: &str,
        args: &[Value],
    ) -> Result<Value, GatewayError> {
        validate_call_fields(address, function_name, Some(abi))?;

        let binding = ContractBinding::from_json(abi)?;
        let function = binding.function(function_name, args.len())?;

        let to = parse_address(address)?;
        let values = coerce_args(function, args).map_err(GatewayError::invalid_argument)?;
        let calldata = function
            .abi_encode_input(&values)
            .map_err(|e| GatewayError::invalid_argument(e.to_string()))?;

        tracing::debug!(
            endpoint = %handle.endpoint(),
            contract = %to,
            function = %function.signature(),
            calldata_len = calldata.len(),
            "dispatching eth_call"
        );

        let returned = self
            .eth_call(handle, &to, &calldata)
            .await
            .map_err(|e| classify(e, binding.abi()))?;

        let result = decode_result(function, &returned)?;
        tracing::debug!(function = %function.signature(), "eth_call decoded");
        Ok(result)
    }

    async fn eth_call(
        &self,
        handle: &ProviderHandle,
        to: &Address,
        calldata: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        let params = vec![
            json!({ "to": to.to_checksum(None), "data": format!("0x{}", hex::encode(calldata)) }),
            json!("latest"),
        ];
        let ms = self.call_timeout.as_millis() as u64;
        let raw = tokio::time::timeout(self.call_timeout, handle.transport().request("eth_call", params))
            .await
            .map_err(|_| TransportError::Timeout { ms })??;

        let text = raw
            .as_str()
            .ok_or_else(|| TransportError::Other(format!("eth_call returned non-string result {raw}")))?;
        let digits = text.strip_prefix("0x").unwrap_or(text);
        hex::decode(digits).map_err(|e| TransportError::Other(format!("eth_call returned invalid hex: {e}")))
    }
}

fn parse_address(address: &str) -> Result<Address, GatewayError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|_| GatewayError::invalid_argument(format!("invalid contract address '{address}'")))
}

/// Map a transport failure to the gateway taxonomy, decoding revert data
/// against the caller's ABI where the node supplied it.
fn classify(err: TransportError, abi: &JsonAbi) -> GatewayError {
    match err {
        TransportError::Rpc(rpc) if rpc.is_revert() => {
            let reason = revert_reason(&rpc, abi);
            tracing::info!(code = rpc.code, reason = ?reason, "contract call reverted");
            GatewayError::CallException { reason }
        }
        other => {
            let mapped = GatewayError::from(other);
            if mapped.is_client_error() {
                tracing::info!(error = %mapped, "eth_call rejected");
            } else {
                tracing::warn!(error = %mapped, code = %mapped.code(), "eth_call failed");
            }
            mapped
        }
    }
}

fn revert_reason(rpc: &JsonRpcError, abi: &JsonAbi) -> Option<String> {
    rpc.revert_data()
        .and_then(|data| decode_revert_reason(&data, abi))
        .or_else(|| rpc.reason_from_message().map(str::to_string))
}

fn decode_result(function: &Function, returned: &[u8]) -> Result<Value, GatewayError> {
    if returned.is_empty() && !function.outputs.is_empty() {
        // Calling a non-contract address, or a function the bytecode lacks.
        return Err(GatewayError::CallException { reason: None });
    }
    let values = function
        .abi_decode_output(returned, true)
        .map_err(|e| GatewayError::unknown(format!("could not decode result data: {e}")))?;
    Ok(normalize_outputs(values, &function.outputs).to_json())
}
