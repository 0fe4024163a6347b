//! The TestToken read sequence used by `chaincall demo`.

use serde_json::{json, Value};

pub struct DemoCall {
    pub function: &'static str,
    pub description: &'static str,
    pub abi: Value,
}

fn getter(name: &str, internal: &str, ty: &str) -> Value {
    json!({
        "inputs": [],
        "name": name,
        "outputs": [{ "internalType": internal, "name": "", "type": ty }],
        "stateMutability": "view",
        "type": "function"
    })
}

/// Every read-only function TestToken exposes, in demo order.
pub fn test_token_calls() -> Vec<DemoCall> {
    vec![
        DemoCall {
            function: "name",
            description: "token name",
            abi: getter("name", "string", "string"),
        },
        DemoCall {
            function: "symbol",
            description: "token symbol",
            abi: getter("symbol", "string", "string"),
        },
        DemoCall {
            function: "decimals",
            description: "decimal places",
            abi: getter("decimals", "uint8", "uint8"),
        },
        DemoCall {
            function: "totalSupply",
            description: "total supply in base units",
            abi: getter("totalSupply", "uint256", "uint256"),
        },
        DemoCall {
            function: "owner",
            description: "contract owner",
            abi: getter("owner", "address", "address"),
        },
        DemoCall {
            function: "paused",
            description: "whether transfers are paused",
            abi: getter("paused", "bool", "bool"),
        },
        DemoCall {
            function: "getTokenInfo",
            description: "all token metadata in one call",
            abi: json!({
                "inputs": [],
                "name": "getTokenInfo",
                "outputs": [
                    { "internalType": "string",  "name": "_name",        "type": "string" },
                    { "internalType": "string",  "name": "_symbol",      "type": "string" },
                    { "internalType": "uint8",   "name": "_decimals",    "type": "uint8" },
                    { "internalType": "uint256", "name": "_totalSupply", "type": "uint256" },
                    { "internalType": "address", "name": "_owner",       "type": "address" },
                    { "internalType": "bool",    "name": "_paused",      "type": "bool" }
                ],
                "stateMutability": "view",
                "type": "function"
            }),
        },
        DemoCall {
            function: "getCurrentTimestamp",
            description: "block timestamp seen by the contract",
            abi: getter("getCurrentTimestamp", "uint256", "uint256"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaincall_evm::ContractBinding;

    #[test]
    fn every_demo_fragment_binds() {
        let calls = test_token_calls();
        assert_eq!(calls.len(), 8);
        for call in calls {
            let binding = ContractBinding::from_json(&json!([call.abi])).unwrap();
            assert!(binding.function(call.function, 0).is_ok(), "{}", call.function);
        }
    }
}
