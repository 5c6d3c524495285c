//! Music-industry knowledge graph access.
//!
//! The graph is an optional dependency. Whether it can be used is decided
//! once at startup and carried around as a [`GraphCapability`].

mod memory;
mod neo4j;

pub use memory::StaticGraph;
pub use neo4j::Neo4jClient;

use crate::config::GraphSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// One matching node: its properties and type labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecord {
    pub properties: Map<String, Value>,
    pub entity_types: Vec<String>,
}

impl EntityRecord {
    pub fn new(properties: Map<String, Value>, entity_types: Vec<String>) -> Self {
        Self {
            properties,
            entity_types,
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Display name: `name`, then `title`.
    pub fn name(&self) -> Option<&str> {
        self.text("name").or_else(|| self.text("title"))
    }

    /// Description: `comment`, then `description`.
    pub fn description(&self) -> Option<&str> {
        self.text("comment").or_else(|| self.text("description"))
    }

    /// Whether the record carries anything worth showing.
    pub fn is_displayable(&self) -> bool {
        !self.properties.is_empty() && !self.entity_types.is_empty()
    }
}

/// Result of an entity search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphResponse {
    pub success: bool,
    pub data: Vec<EntityRecord>,
}

/// Client for a graph database holding music-industry entities.
#[async_trait]
pub trait GraphClient: Send + Sync {
    /// Search entities matching `query`, returning at most `limit` records.
    async fn search_entities(&self, query: &str, limit: usize) -> Result<GraphResponse>;
}

/// Whether the knowledge graph can be used for this process.
#[derive(Clone)]
pub enum GraphCapability {
    Available(Arc<dyn GraphClient>),
    Unavailable { reason: String },
}

impl GraphCapability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        GraphCapability::Unavailable {
            reason: reason.into(),
        }
    }

    /// Connect according to settings. Never fails: any problem yields
    /// `Unavailable` and a warning.
    pub async fn resolve(settings: &GraphSettings) -> Self {
        if !settings.enabled {
            return Self::unavailable("disabled in configuration");
        }
        let Some(uri) = settings.uri.as_deref() else {
            return Self::unavailable("NEO4J_URI is not set");
        };

        match Neo4jClient::connect(uri, settings).await {
            Ok(client) => {
                info!("Knowledge graph connected at {}", uri);
                GraphCapability::Available(Arc::new(client))
            }
            Err(e) => {
                warn!("Knowledge graph initialization failed: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn client(&self) -> Option<&Arc<dyn GraphClient>> {
        match self {
            GraphCapability::Available(client) => Some(client),
            GraphCapability::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client().is_some()
    }
}

impl std::fmt::Debug for GraphCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphCapability::Available(_) => write!(f, "Available"),
            GraphCapability::Unavailable { reason } => write!(f, "Unavailable({})", reason),
        }
    }
}
