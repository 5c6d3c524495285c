//! In-memory knowledge graph.
//!
//! Useful for testing and offline runs.

use super::{EntityRecord, GraphClient, GraphResponse};
use crate::error::{DaisyError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A fixed set of entities searched by substring, or a graph that always
/// fails (to exercise degraded paths).
pub struct StaticGraph {
    entities: Vec<EntityRecord>,
    failure: Option<String>,
}

impl StaticGraph {
    pub fn new(entities: Vec<EntityRecord>) -> Self {
        Self {
            entities,
            failure: None,
        }
    }

    /// A graph whose every search returns an error.
    pub fn failing(message: &str) -> Self {
        Self {
            entities: Vec::new(),
            failure: Some(message.to_string()),
        }
    }

    /// Convenience constructor for a named entity.
    pub fn entity(name: &str, types: &[&str], description: Option<&str>) -> EntityRecord {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(name.to_string()));
        if let Some(desc) = description {
            properties.insert("comment".to_string(), Value::String(desc.to_string()));
        }
        EntityRecord::new(properties, types.iter().map(|t| t.to_string()).collect())
    }
}

#[async_trait]
impl GraphClient for StaticGraph {
    async fn search_entities(&self, query: &str, limit: usize) -> Result<GraphResponse> {
        if let Some(message) = &self.failure {
            return Err(DaisyError::Graph(message.clone()));
        }

        let needle = query.to_lowercase();
        let data = self
            .entities
            .iter()
            .filter(|e| {
                e.name().is_some_and(|n| n.to_lowercase().contains(&needle))
                    || e.description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect();

        Ok(GraphResponse {
            success: true,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_graph_search() {
        let graph = StaticGraph::new(vec![
            StaticGraph::entity("Hyperpop", &["Genre"], Some("Maximalist pop offshoot")),
            StaticGraph::entity("Pop Punk", &["Genre"], None),
            StaticGraph::entity("Sub Pop", &["Label"], None),
        ]);

        let response = graph.search_entities("pop", 2).await.unwrap();
        assert!(response.success);
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].name(), Some("Hyperpop"));
    }

    #[tokio::test]
    async fn test_failing_graph() {
        let graph = StaticGraph::failing("connection reset");
        assert!(graph.search_entities("pop", 5).await.is_err());
    }
}
