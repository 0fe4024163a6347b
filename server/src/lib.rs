//! chaincall-server — HTTP gateway for read-only contract calls.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chaincall_server::{build_router, Gateway, GatewayConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = GatewayConfig::from_env()?;
//! let app = build_router(Arc::new(Gateway::from_config(&config)), &config.base_path);
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod gateway;
pub mod routes;
pub mod tracing_setup;

pub use config::GatewayConfig;
pub use gateway::Gateway;
pub use routes::build_router;
pub use tracing_setup::{init_tracing, LogConfig};
