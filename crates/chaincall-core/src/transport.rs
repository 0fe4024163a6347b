//! The `RpcTransport` trait: one connection to one node.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The central async trait every RPC transport must implement.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;

    /// Convenience: call a method and return the raw `result` value.
    ///
    /// A JSON-RPC error object becomes [`TransportError::Rpc`].
    async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let req = JsonRpcRequest::new(1, method, params);
        let resp = self.send(req).await?;
        resp.into_result().map_err(TransportError::Rpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::JsonRpcError;
    use serde_json::json;

    struct EchoTransport {
        fail: bool,
    }

    #[async_trait]
    impl RpcTransport for EchoTransport {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            if self.fail {
                return Ok(JsonRpcResponse::failure(
                    1,
                    JsonRpcError {
                        code: -32601,
                        message: format!("method {} not found", req.method),
                        data: None,
                    },
                ));
            }
            Ok(JsonRpcResponse::success(1, json!(req.method)))
        }

        fn url(&self) -> &str {
            "mock://echo"
        }
    }

    #[tokio::test]
    async fn request_returns_result() {
        let t = EchoTransport { fail: false };
        let v = t.request("eth_chainId", vec![]).await.unwrap();
        assert_eq!(v, json!("eth_chainId"));
    }

    #[tokio::test]
    async fn request_surfaces_rpc_error() {
        let t = EchoTransport { fail: true };
        let err = t.request("eth_foo", vec![]).await.unwrap_err();
        match err {
            TransportError::Rpc(e) => assert_eq!(e.code, -32601),
            other => panic!("expected Rpc, got {other:?}"),
        }
    }
}
