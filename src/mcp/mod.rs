//! MCP (Model Context Protocol) server for one Daisy agent.
//!
//! Lets an MCP-capable runtime call the agent's tools and fetch its
//! instruction. Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
