//! Builds a callable surface from a caller-supplied ABI.
//!
//! The ABI arrives as untyped JSON in one of several shapes; everything is
//! funnelled into an alloy [`JsonAbi`] and indexed by function name once per
//! request.

use alloy_json_abi::{Function, JsonAbi};
use serde_json::{Map, Value};

use chaincall_core::error::GatewayError;

/// Function lookup over one contract's ABI.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    abi: JsonAbi,
}

impl ContractBinding {
    /// Parse the ABI in any accepted form:
    /// - array of fragment objects (standard solc output)
    /// - a single fragment object
    /// - array of human-readable signatures (`"function symbol() view returns (string)"`)
    /// - a JSON string containing any of the above
    pub fn from_json(abi: &Value) -> Result<Self, GatewayError> {
        let abi = parse_abi(abi).map_err(|e| GatewayError::invalid_argument(format!("invalid ABI: {e}")))?;
        Ok(Self { abi })
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Returns `true` if any overload matches `name` (bare name or full signature).
    pub fn has_function(&self, name: &str) -> bool {
        !self.candidates(name).is_empty()
    }

    /// Select the function to call for `name` with `arg_count` arguments.
    ///
    /// A single overload is returned as-is, even if the argument count is
    /// off; the encoder reports that mismatch. With several overloads the
    /// argument count must pick exactly one.
    pub fn function(&self, name: &str, arg_count: usize) -> Result<&Function, GatewayError> {
        let candidates = self.candidates(name);
        match candidates.as_slice() {
            [] => Err(GatewayError::FunctionNotFound {
                name: name.to_string(),
            }),
            [only] => Ok(only),
            many => {
                let mut matching = many.iter().filter(|f| f.inputs.len() == arg_count);
                match (matching.next(), matching.next()) {
                    (Some(f), None) => Ok(f),
                    (None, _) => Err(GatewayError::invalid_argument(format!(
                        "no overload of '{name}' takes {arg_count} arguments"
                    ))),
                    (Some(_), Some(_)) => {
                        let sigs: Vec<String> = many.iter().map(|f| f.signature()).collect();
                        Err(GatewayError::invalid_argument(format!(
                            "ambiguous function description '{name}' (use one of: {})",
                            sigs.join(", ")
                        )))
                    }
                }
            }
        }
    }

    fn candidates(&self, name: &str) -> Vec<&Function> {
        let name = name.trim();
        if name.contains('(') {
            let wanted: String = name.chars().filter(|c| !c.is_whitespace()).collect();
            self.abi.functions().filter(|f| f.signature() == wanted).collect()
        } else {
            self.abi
                .function(name)
                .map(|overloads| overloads.iter().collect())
                .unwrap_or_default()
        }
    }
}

fn parse_abi(abi: &Value) -> Result<JsonAbi, String> {
    match abi {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_string) => {
            let sigs = items.iter().filter_map(Value::as_str);
            JsonAbi::parse(sigs).map_err(|e| e.to_string())
        }
        Value::Array(items) => {
            let fragments = items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(Value::Object(with_fragment_defaults(map))),
                    other => Err(format!("expected an ABI fragment object, got {other}")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::from_value(Value::Array(fragments)).map_err(|e| e.to_string())
        }
        Value::Object(map) => parse_abi(&Value::Array(vec![Value::Object(map.clone())])),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                let value: Value = serde_json::from_str(trimmed).map_err(|e| e.to_string())?;
                parse_abi(&value)
            } else {
                JsonAbi::parse([trimmed]).map_err(|e| e.to_string())
            }
        }
        other => Err(format!("unsupported ABI value {other}")),
    }
}

/// Fill in fields that hand-written fragments commonly omit and solc
/// always emits.
fn with_fragment_defaults(fragment: &Map<String, Value>) -> Map<String, Value> {
    let mut out = fragment.clone();
    out.entry("type").or_insert_with(|| Value::String("function".into()));
    if out.get("type").and_then(Value::as_str) == Some("function") {
        out.entry("inputs").or_insert_with(|| Value::Array(vec![]));
        out.entry("outputs").or_insert_with(|| Value::Array(vec![]));
        if !out.contains_key("stateMutability")
            && !out.contains_key("constant")
            && !out.contains_key("payable")
        {
            out.insert("stateMutability".into(), Value::String("nonpayable".into()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaincall_core::error::ErrorCode;
    use serde_json::json;

    fn erc20_fragments() -> Value {
        json!([
            {
                "inputs": [],
                "name": "symbol",
                "outputs": [{ "internalType": "string", "name": "", "type": "string" }],
                "stateMutability": "view",
                "type": "function"
            },
            {
                "inputs": [{ "internalType": "address", "name": "account", "type": "address" }],
                "name": "balanceOf",
                "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
                "stateMutability": "view",
                "type": "function"
            },
            {
                "anonymous": false,
                "inputs": [],
                "name": "Paused",
                "type": "event"
            }
        ])
    }

    #[test]
    fn binds_fragment_array() {
        let b = ContractBinding::from_json(&erc20_fragments()).unwrap();
        assert!(b.has_function("symbol"));
        assert!(b.has_function("balanceOf"));
        assert!(!b.has_function("Paused"));
    }

    #[test]
    fn binds_single_object_and_json_text() {
        let single = json!({
            "inputs": [],
            "name": "decimals",
            "outputs": [{ "name": "", "type": "uint8" }],
            "stateMutability": "view",
            "type": "function"
        });
        assert!(ContractBinding::from_json(&single).unwrap().has_function("decimals"));

        let text = Value::String(erc20_fragments().to_string());
        assert!(ContractBinding::from_json(&text).unwrap().has_function("balanceOf"));
    }

    #[test]
    fn binds_human_readable() {
        let abi = json!([
            "function name() view returns (string)",
            "function balanceOf(address owner) view returns (uint256)"
        ]);
        let b = ContractBinding::from_json(&abi).unwrap();
        let f = b.function("balanceOf", 1).unwrap();
        assert_eq!(f.signature(), "balanceOf(address)");
    }

    #[test]
    fn fills_in_missing_fragment_fields() {
        let abi = json!([{ "name": "owner", "outputs": [{ "name": "", "type": "address" }] }]);
        let b = ContractBinding::from_json(&abi).unwrap();
        assert!(b.function("owner", 0).unwrap().inputs.is_empty());
    }

    #[test]
    fn lookup_by_signature() {
        let b = ContractBinding::from_json(&erc20_fragments()).unwrap();
        assert!(b.has_function("balanceOf(address)"));
        assert!(b.has_function("balanceOf( address )"));
        assert!(!b.has_function("balanceOf(uint256)"));
    }

    #[test]
    fn missing_function_is_not_found() {
        let b = ContractBinding::from_json(&erc20_fragments()).unwrap();
        let err = b.function("foo", 0).unwrap_err();
        assert_eq!(err.to_string(), "Function 'foo' not found in contract ABI");
        assert_eq!(err.code(), ErrorCode::FunctionNotFound);
    }

    #[test]
    fn overloads_pick_by_arity() {
        let abi = json!([
            "function safeTransferFrom(address from, address to, uint256 id) view",
            "function safeTransferFrom(address from, address to, uint256 id, bytes data) view"
        ]);
        let b = ContractBinding::from_json(&abi).unwrap();
        assert_eq!(b.function("safeTransferFrom", 4).unwrap().inputs.len(), 4);
        assert_eq!(b.function("safeTransferFrom", 3).unwrap().inputs.len(), 3);
        let err = b.function("safeTransferFrom", 1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn ambiguous_overloads_are_rejected() {
        let abi = json!([
            "function get(uint256 id) view returns (uint256)",
            "function get(address who) view returns (uint256)"
        ]);
        let b = ContractBinding::from_json(&abi).unwrap();
        let err = b.function("get", 1).unwrap_err();
        assert!(err.to_string().contains("ambiguous function description"));
        assert!(b.function("get(address)", 1).is_ok());
    }

    #[test]
    fn garbage_abi_is_invalid_argument() {
        let err = ContractBinding::from_json(&json!(42)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.to_string().starts_with("Invalid arguments provided: invalid ABI"));

        let err = ContractBinding::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }
}
