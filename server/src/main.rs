//! `chaincall-server` — serve the contract-call gateway over HTTP.
//!
//! Configuration comes from `CHAINCALL_*` environment variables; see
//! [`GatewayConfig`].

use std::sync::Arc;

use anyhow::{Context, Result};
use chaincall_server::{build_router, init_tracing, Gateway, GatewayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env()?;
    init_tracing(&config.log);

    let gateway = Arc::new(Gateway::from_config(&config));
    let app = build_router(gateway, &config.base_path);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %addr,
        base_path = %config.base_path,
        default_rpc = %config.default_rpc_url,
        fallback_rpc = %config.fallback_rpc_url,
        "chaincall-server listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
