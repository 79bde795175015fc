//! Daemon entry point for the coda MCP server.
//!
//! Loads configuration from the environment, builds the Coda API client, and
//! serves the MCP protocol over stdio or streamable HTTP.

mod config;
mod control;

use coda_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CodaConfig;
use crate::control::build_control;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = CodaConfig::from_args()?;
    let control = build_control(&config)?;
    info!(base_url = %config.base_url, "coda client configured");

    match config.mcp_http_addr {
        Some(addr) => serve_streamable_http(control, McpHttpServerConfig::new(addr)).await,
        None => serve_stdio(control).await,
    }
}
