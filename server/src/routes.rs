//! HTTP surface.
//!
//! - `GET  {base}/ethvaultapitest`                    info / liveness
//! - `GET  {base}/ethvaultapitest/demo`               simulated response, no network
//! - `POST {base}/ethvaultapitest/contract/:address`  contract read

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use chaincall_core::call::{iso_timestamp, ContractCallRequest, ContractCallResponse};
use chaincall_core::error::GatewayError;

use crate::gateway::Gateway;

const API_NAME: &str = "ethvaultapitest";

// ── Request / Response Types ────────────────────────────────────

/// POST body. The address comes from the path.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallBody {
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub abi: Option<Value>,
    #[serde(default)]
    pub args: Option<Vec<Value>>,
    #[serde(default)]
    pub rpc_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub test: String,
    pub contract_interaction: String,
    pub demo: String,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub api_name: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct DemoInfo {
    pub decimals: u8,
    pub total_supply: String,
    pub example_balance: String,
}

#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub success: bool,
    pub message: String,
    pub contract_address: String,
    pub contract_name: String,
    pub function_name: String,
    pub result: String,
    pub additional_info: DemoInfo,
    pub simulation_note: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// A [`GatewayError`] rendered as `{ success: false, message }`.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if let GatewayError::Network { detail } = &self.0 {
            tracing::error!(detail = %detail, "node unreachable");
        }
        let body = ErrorBody {
            success: false,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────

#[derive(Clone)]
struct AppState {
    gateway: Arc<Gateway>,
    base_path: String,
}

/// GET /ethvaultapitest
async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let base = format!("{}/{API_NAME}", state.base_path);
    Json(InfoResponse {
        success: true,
        message: "EthVault API Test is working!".into(),
        timestamp: iso_timestamp(),
        api_name: API_NAME.into(),
        endpoints: Endpoints {
            test: base.clone(),
            contract_interaction: format!("{base}/contract/:address"),
            demo: format!("{base}/demo"),
        },
    })
}

/// GET /ethvaultapitest/demo
async fn demo() -> Json<DemoResponse> {
    tracing::debug!("serving simulated contract data");
    Json(DemoResponse {
        success: true,
        message: "Demo: Simulated smart contract interaction".into(),
        contract_address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".into(),
        contract_name: "Tether USD (USDT)".into(),
        function_name: "symbol".into(),
        result: "USDT".into(),
        additional_info: DemoInfo {
            decimals: 6,
            total_supply: "46891737785381796".into(),
            example_balance: "1000000000".into(),
        },
        simulation_note: "This is simulated data to demonstrate API functionality".into(),
        timestamp: iso_timestamp(),
    })
}

/// POST /ethvaultapitest/contract/:address
async fn call_contract(
    State(state): State<AppState>,
    Path(address): Path<String>,
    body: Result<Json<ContractCallBody>, JsonRejection>,
) -> Result<Json<ContractCallResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        GatewayError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let request = ContractCallRequest {
        address,
        function_name: body.function_name.unwrap_or_default(),
        abi: body.abi,
        args: body.args.unwrap_or_default(),
        rpc_url: body.rpc_url,
    };
    Ok(Json(state.gateway.call(request).await?))
}

// ── Router ──────────────────────────────────────────────────────

/// Build the router with every route nested under `base_path`.
pub fn build_router(gateway: Arc<Gateway>, base_path: &str) -> Router {
    let base_path = normalize_base_path(base_path);
    let state = AppState {
        gateway,
        base_path: base_path.clone(),
    };

    let api = Router::new()
        .route(&format!("/{API_NAME}"), get(info))
        .route(&format!("/{API_NAME}/demo"), get(demo))
        .route(&format!("/{API_NAME}/contract/:address"), post(call_contract))
        .with_state(state);

    let router = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(&base_path, api)
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// `"api/v1/"` → `"/api/v1"`, `"/"` → `""`.
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path("/api/v1"), "/api/v1");
        assert_eq!(normalize_base_path("api/v1/"), "/api/v1");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn error_body_shape() {
        let resp = ApiError(GatewayError::FunctionNotFound { name: "foo".into() }).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = ErrorBody {
            success: false,
            message: "Function 'foo' not found in contract ABI".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Function 'foo' not found in contract ABI"}"#);
    }

    #[test]
    fn timeout_is_gateway_timeout() {
        let resp = ApiError(GatewayError::Timeout { ms: 15000 }).into_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
