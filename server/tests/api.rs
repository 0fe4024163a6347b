//! HTTP surface tests, served in-process against an in-memory node.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy_core::dyn_abi::DynSolValue;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use chaincall_core::error::TransportError;
use chaincall_core::request::{JsonRpcRequest, JsonRpcResponse};
use chaincall_core::transport::RpcTransport;
use chaincall_providers::Connector;
use chaincall_server::{build_router, Gateway, GatewayConfig};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
const DEAD_PRIMARY: &str = "https://dead.example";

/// Answers `eth_chainId` and returns `symbol() = "USDT"` for every `eth_call`.
struct TokenNode {
    url: String,
}

#[async_trait]
impl RpcTransport for TokenNode {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        match req.method.as_str() {
            "eth_chainId" => Ok(JsonRpcResponse::success(1, json!("0xaa36a7"))),
            "eth_call" => {
                let data = DynSolValue::Tuple(vec![DynSolValue::String("USDT".into())]).abi_encode_params();
                Ok(JsonRpcResponse::success(1, json!(format!("0x{}", hex::encode(data)))))
            }
            other => Err(TransportError::Other(format!("unexpected method {other}"))),
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Every URL is live except [`DEAD_PRIMARY`], which refuses connections.
#[derive(Default)]
struct CountingConnector {
    connects: AtomicUsize,
}

#[async_trait]
impl Connector for CountingConnector {
    async fn connect(&self, url: &str) -> Result<Arc<dyn RpcTransport>, TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if url == DEAD_PRIMARY {
            return Err(TransportError::Http("connection refused".into()));
        }
        Ok(Arc::new(TokenNode { url: url.to_string() }))
    }
}

fn app() -> (Router, Arc<CountingConnector>) {
    let connector = Arc::new(CountingConnector::default());
    let config = GatewayConfig::default();
    let gateway = Gateway::with_connector(&config, connector.clone());
    (build_router(Arc::new(gateway), &config.base_path), connector)
}

fn symbol_abi() -> Value {
    json!([{
        "inputs": [],
        "name": "symbol",
        "outputs": [{ "internalType": "string", "name": "", "type": "string" }],
        "stateMutability": "view",
        "type": "function"
    }])
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(address: &str, body: Value) -> Request<Body> {
    post_raw(address, body.to_string())
}

fn post_raw(address: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/v1/ethvaultapitest/contract/{address}"))
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn symbol_call_succeeds() {
    let (app, connector) = app();
    let (status, body) = send(
        app,
        post(USDT, json!({ "functionName": "symbol", "abi": symbol_abi() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["contract_address"], json!(USDT));
    assert_eq!(body["function_name"], json!("symbol"));
    assert_eq!(body["arguments"], json!([]));
    assert_eq!(body["result"], json!("USDT"));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_fields_are_rejected_before_any_connection() {
    let cases = [
        (json!({ "abi": symbol_abi() }), "Function name is required"),
        (json!({ "functionName": "symbol" }), "Contract ABI is required"),
        (json!({ "functionName": "symbol", "abi": [] }), "Contract ABI is required"),
        (json!({ "functionName": "", "abi": symbol_abi() }), "Function name is required"),
        (json!({ "functionName": null, "abi": symbol_abi() }), "Function name is required"),
        (json!({ "functionName": "symbol", "abi": null }), "Contract ABI is required"),
        (json!({ "functionName": "symbol", "abi": false }), "Contract ABI is required"),
    ];

    for (payload, message) in cases {
        let (app, connector) = app();
        let (status, body) = send(app, post(USDT, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "message": message }));
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn unknown_function_is_400() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        post(USDT, json!({ "functionName": "foo", "abi": symbol_abi() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Function 'foo' not found in contract ABI" })
    );
}

#[tokio::test]
async fn dead_primary_still_succeeds_via_fallback() {
    let (app, connector) = app();
    let (status, body) = send(
        app,
        post(
            USDT,
            json!({ "functionName": "symbol", "abi": symbol_abi(), "rpcUrl": DEAD_PRIMARY }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!("USDT"));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (app, connector) = app();
    let (status, body) = send(app, post_raw(USDT, "{ not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn info_lists_endpoints() {
    let (app, _) = app();
    let (status, body) = send(app, get("/api/v1/ethvaultapitest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["api_name"], json!("ethvaultapitest"));
    assert_eq!(body["endpoints"]["test"], json!("/api/v1/ethvaultapitest"));
    assert_eq!(
        body["endpoints"]["contract_interaction"],
        json!("/api/v1/ethvaultapitest/contract/:address")
    );
    assert_eq!(body["endpoints"]["demo"], json!("/api/v1/ethvaultapitest/demo"));
}

#[tokio::test]
async fn demo_is_simulated() {
    let (app, connector) = app();
    let (status, body) = send(app, get("/api/v1/ethvaultapitest/demo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contract_address"], json!(USDT));
    assert_eq!(body["contract_name"], json!("Tether USD (USDT)"));
    assert_eq!(body["result"], json!("USDT"));
    assert_eq!(body["additional_info"]["decimals"], json!(6));
    assert_eq!(body["additional_info"]["total_supply"], json!("46891737785381796"));
    assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
}
