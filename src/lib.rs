//! Daisy - music-industry LLM agents
//!
//! Configuration glue for the DaisyAI agents: each agent is an immutable
//! descriptor (model, instruction, tools) built once at startup, and an
//! external runtime drives it by calling tools by name.
//!
//! # Overview
//!
//! - `daisy_knowledge` answers industry questions from keyword-matched tables
//! - `daisy_talent` scouts artists, trends and venues from static tables
//! - `daisy_knowledge_hub` retrieves documents from Vertex AI Search and
//!   enriches them from a Neo4j music ontology (or answers from canned text
//!   in static mode)
//!
//! # Architecture
//!
//! - `config` - Settings (file + environment) and instruction overrides
//! - `tool` - Tool handles, argument binding and the tool registry
//! - `lookup` - Lookup tables and the keyword matcher
//! - `retrieval` - Retriever/reranker seams, Vertex backends, the retrieval adapter
//! - `graph` - Knowledge graph access and the graph capability
//! - `agents` - Agent descriptors and the catalog
//! - `runtime` - Local tool-calling loop over an OpenAI-compatible endpoint
//! - `mcp` - MCP server exposing one agent
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use daisy::agents::AgentCatalog;
//! use daisy::config::Settings;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let catalog = AgentCatalog::bootstrap(&settings).await?;
//!
//!     let talent = catalog.get("daisy_talent")?;
//!     let report = talent
//!         .tools()
//!         .invoke("analyze_artist_potential", Some(&json!({"artist_name": "Luna Santos"})))
//!         .await?;
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod lookup;
pub mod mcp;
pub mod retrieval;
pub mod runtime;
pub mod tool;

pub use error::{DaisyError, Result};
