//! Transport errors and the gateway's API error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur during an RPC transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, DNS, non-2xx status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Endpoint URL could not be used to build a transport.
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if the node could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::InvalidUrl { .. })
    }

    /// Returns `true` if the request hit its time bound.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ─── Gateway taxonomy ──────────────────────────────────────────────────────────

/// Stable failure code attached to every [`GatewayError`].
///
/// Callers classify failures by this code, never by message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    FunctionNotFound,
    CallException,
    InvalidArgument,
    NetworkError,
    Timeout,
    UnknownError,
}

impl ErrorCode {
    /// HTTP status the boundary reports for this code.
    pub fn http_status(self) -> u16 {
        match self {
            Self::ValidationError
            | Self::FunctionNotFound
            | Self::CallException
            | Self::InvalidArgument => 400,
            Self::NetworkError | Self::UnknownError => 500,
            Self::Timeout => 504,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::FunctionNotFound => "FUNCTION_NOT_FOUND",
            Self::CallException => "CALL_EXCEPTION",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(s)
    }
}

/// Every failure the gateway reports to a caller.
///
/// The `Display` output is the user-visible `message` of the error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// A required request field is missing or empty.
    #[error("{reason}")]
    Validation { reason: String },

    /// The bound ABI does not expose the requested function.
    #[error("Function '{name}' not found in contract ABI")]
    FunctionNotFound { name: String },

    /// The node executed the call and it reverted.
    #[error("Contract call failed: {}", .reason.as_deref().unwrap_or("Invalid function call"))]
    CallException { reason: Option<String> },

    /// An argument, the address or the ABI itself is malformed.
    #[error("Invalid arguments provided: {detail}")]
    InvalidArgument { detail: String },

    /// The node could not be reached. The detail is kept for logs only.
    #[error("Network error: Unable to connect to Ethereum node")]
    Network { detail: String },

    /// The call did not complete within the configured bound.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Anything not classified above.
    #[error("Smart contract interaction failed: {detail}")]
    Unknown { detail: String },
}

impl GatewayError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        Self::InvalidArgument {
            detail: detail.into(),
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown {
            detail: detail.into(),
        }
    }

    /// The structured failure code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::FunctionNotFound { .. } => ErrorCode::FunctionNotFound,
            Self::CallException { .. } => ErrorCode::CallException,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Network { .. } => ErrorCode::NetworkError,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Unknown { .. } => ErrorCode::UnknownError,
        }
    }

    /// HTTP status for the response boundary.
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    /// Returns `true` for failures the caller caused (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

impl From<TransportError> for GatewayError {
    /// ABI-less classification: revert reasons come from the node message
    /// only. The invoker decodes revert data against the caller's ABI.
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Http(detail) => Self::Network { detail },
            TransportError::InvalidUrl { url, reason } => Self::Network {
                detail: format!("{url}: {reason}"),
            },
            TransportError::Timeout { ms } => Self::Timeout { ms },
            TransportError::Rpc(rpc) if rpc.is_revert() => Self::CallException {
                reason: rpc.reason_from_message().map(str::to_string),
            },
            TransportError::Rpc(rpc) if rpc.code == JsonRpcError::INVALID_PARAMS => {
                Self::InvalidArgument {
                    detail: rpc.message,
                }
            }
            other => Self::Unknown {
                detail: other.to_string(),
            },
        }
    }
}
