//! MCP command implementation.

use crate::agents::AgentCatalog;
use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;

/// Run the MCP server for one agent.
///
/// Stdout carries the protocol, so nothing else is printed there.
pub async fn run_mcp(agent: &str, settings: Settings) -> Result<()> {
    let catalog = AgentCatalog::bootstrap(&settings).await?;
    let server = McpServer::new(catalog.get(agent)?);
    server.run().await
}
