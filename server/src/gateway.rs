//! Request sequencing: validation → provider resolution → invocation.

use std::sync::Arc;

use chaincall_core::call::{ContractCallRequest, ContractCallResponse};
use chaincall_core::error::GatewayError;
use chaincall_evm::ContractInvoker;
use chaincall_providers::{Connector, HttpConnector, ProviderResolver};

use crate::config::GatewayConfig;

/// Stateless between calls; one instance serves every request.
pub struct Gateway {
    resolver: ProviderResolver,
    invoker: ContractInvoker,
    default_rpc_url: String,
}

impl Gateway {
    pub fn new(resolver: ProviderResolver, invoker: ContractInvoker, default_rpc_url: impl Into<String>) -> Self {
        Self {
            resolver,
            invoker,
            default_rpc_url: default_rpc_url.into(),
        }
    }

    /// Gateway over real HTTP endpoints.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::with_connector(config, Arc::new(HttpConnector::new(config.http_client_config())))
    }

    /// Gateway using `connector` for every node connection.
    pub fn with_connector(config: &GatewayConfig, connector: Arc<dyn Connector>) -> Self {
        Self::new(
            ProviderResolver::new(connector, config.resolver_config()),
            ContractInvoker::new(config.call_timeout()),
            config.default_rpc_url.clone(),
        )
    }

    /// Serve one contract read.
    ///
    /// Missing fields are rejected before a provider is resolved, so an
    /// invalid request never opens a connection.
    pub async fn call(&self, request: ContractCallRequest) -> Result<ContractCallResponse, GatewayError> {
        request.validate()?;
        let abi = request
            .abi
            .as_ref()
            .ok_or_else(|| GatewayError::validation("Contract ABI is required"))?;

        let rpc_url = request
            .rpc_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.default_rpc_url);

        tracing::info!(
            contract = %request.address,
            function = %request.function_name,
            args = request.args.len(),
            rpc_url = %rpc_url,
            "contract call"
        );

        let handle = self.resolver.resolve(rpc_url).await?;
        let result = self
            .invoker
            .invoke(&handle, &request.address, abi, &request.function_name, &request.args)
            .await;

        match result {
            Ok(result) => Ok(ContractCallResponse::new(request, result)),
            Err(e) => {
                tracing::info!(
                    contract = %request.address,
                    function = %request.function_name,
                    endpoint = %handle.endpoint(),
                    code = %e.code(),
                    error = %e,
                    "contract call failed"
                );
                Err(e)
            }
        }
    }
}
