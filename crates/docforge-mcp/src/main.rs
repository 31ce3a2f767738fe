//! docforge MCP server binary
//!
//! Serves the document tool surface over stdio. Logs go to stderr so the
//! transport stream stays clean.

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use docforge_mcp::DocforgeServer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("starting docforge MCP server");

    let service = DocforgeServer::new().serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
