//! `daisy_knowledge_hub`: document retrieval plus ontology search.
//!
//! The hub answers through a [`KnowledgeBackend`]. In live mode that is the
//! retrieval adapter and the knowledge graph; in static mode it is
//! pre-written text that names the configured data store.

use super::AgentDescriptor;
use crate::config::{Instructions, KnowledgeSettings};
use crate::error::Result;
use crate::graph::GraphCapability;
use crate::retrieval::RetrievalAdapter;
use crate::tool::{ToolArgs, ToolHandle, ToolHandler, ToolParam, ToolRegistry};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

pub const NAME: &str = "daisy_knowledge_hub";

const DESCRIPTION: &str = "DaisyAI Knowledge Agent - Music Industry Intelligence Hub";

const INSTRUCTION: &str = "You are DaisyAI's Knowledge Agent - the central intelligence hub for the music industry AI system.

You have access to powerful knowledge sources:
📚 **Vertex AI Search**: Comprehensive music industry documents, insights, and best practices
🗃️ **Music Industry Ontology**: Knowledge graph with relationships between artists, genres, techniques, and industry entities

**Your capabilities**:
- Answer questions about music industry relationships and connections
- Provide detailed explanations of production techniques and processes
- Offer strategic insights for artists, labels, and industry professionals
- Connect concepts across the entire music ecosystem

**Tools available**:
- retrieve_docs(): Get detailed documents and insights + ontology context
- search_music_ontology(): Search the music industry knowledge graph directly

Always leverage the appropriate tool based on the query complexity. For factual questions, use retrieve_docs(). For relationship and entity searches, use search_music_ontology().";

/// Entities listed by a direct ontology search.
pub const ONTOLOGY_SEARCH_LIMIT: usize = 8;

const DESCRIPTION_PREVIEW_CHARS: usize = 150;

/// Source of answers for the hub's two tools. Neither operation fails:
/// problems are described in the returned text.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    async fn retrieve_docs(&self, query: &str) -> String;

    async fn search_ontology(&self, query: &str) -> String;
}

/// Managed search and the knowledge graph.
pub struct LiveKnowledge {
    adapter: RetrievalAdapter,
    graph: GraphCapability,
}

impl LiveKnowledge {
    pub fn new(adapter: RetrievalAdapter, graph: GraphCapability) -> Self {
        Self { adapter, graph }
    }
}

#[async_trait]
impl KnowledgeBackend for LiveKnowledge {
    async fn retrieve_docs(&self, query: &str) -> String {
        self.adapter.retrieve(query).await
    }

    async fn search_ontology(&self, query: &str) -> String {
        let Some(client) = self.graph.client() else {
            return "🗃️ Music Industry Ontology temporarily unavailable. Using document knowledge base instead."
                .to_string();
        };

        let response = match client.search_entities(query, ONTOLOGY_SEARCH_LIMIT).await {
            Ok(response) => response,
            Err(e) => {
                error!("Music ontology search error: {}", e);
                return format!("❌ Error searching music ontology: {}", e);
            }
        };

        if !response.success || response.data.is_empty() {
            return format!(
                "🔍 No music industry entities found matching '{}' in the ontology.",
                query
            );
        }

        let mut lines = vec![format!(
            "🎯 Found {} music industry entities matching '{}':",
            response.data.len(),
            query
        )];
        for record in response.data.iter().filter(|r| r.is_displayable()) {
            let mut line = format!(
                "🎵 **{}** ({})",
                record.name().unwrap_or("Unknown Entity"),
                record.entity_types.join(", ")
            );
            if let Some(desc) = record.description() {
                let preview: String = desc.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
                line.push_str(&format!("\n   📝 {}...", preview));
            }
            lines.push(line);
        }
        lines.push("\n📊 **Source**: DaisyAI Music Industry Knowledge Graph".to_string());
        lines.join("\n")
    }
}

/// Canned results for environments without managed search.
pub struct StaticKnowledge {
    project_id: String,
    data_store_id: String,
    data_store_region: String,
}

impl StaticKnowledge {
    pub fn new(settings: &KnowledgeSettings) -> Self {
        Self {
            project_id: settings.project_id.clone(),
            data_store_id: settings.data_store_id.clone(),
            data_store_region: settings.data_store_region.clone(),
        }
    }
}

#[async_trait]
impl KnowledgeBackend for StaticKnowledge {
    async fn retrieve_docs(&self, query: &str) -> String {
        format!(
            "🎯 DaisyAI Knowledge Agent Results for: \"{query}\"

📚 **Music Industry Insights Available**:
- Artist development strategies
- Label operations and A&R processes
- Production techniques and workflows
- Industry relationship mapping
- Rights management and licensing

🔧 **Agent Configuration**:
- Project: {project}
- Data Store: {store}
- Region: {region}

💡 This agent provides comprehensive music industry intelligence through document search and knowledge graph exploration.",
            query = query,
            project = self.project_id,
            store = self.data_store_id,
            region = self.data_store_region,
        )
    }

    async fn search_ontology(&self, query: &str) -> String {
        format!(
            "🗃️ Music Industry Ontology Search: \"{}\"

🎵 **Knowledge Graph Entities Found**:
- Artists and their relationships
- Musical genres and subgenres
- Production techniques and equipment
- Industry roles and connections
- Rights and licensing structures

🔗 **Relationship Mapping**:
- Artist collaborations
- Genre influences and evolution
- Production workflows
- Industry hierarchies

📊 **Source**: DaisyAI Music Industry Knowledge Graph
💡 Use this for exploring connections between artists, genres, techniques, and industry concepts.",
            query
        )
    }
}

struct RetrieveDocs(Arc<dyn KnowledgeBackend>);

#[async_trait]
impl ToolHandler for RetrieveDocs {
    async fn call(&self, args: &ToolArgs) -> String {
        self.0.retrieve_docs(args.str("query")).await
    }
}

struct SearchOntology(Arc<dyn KnowledgeBackend>);

#[async_trait]
impl ToolHandler for SearchOntology {
    async fn call(&self, args: &ToolArgs) -> String {
        self.0.search_ontology(args.str("query")).await
    }
}

/// Build the tool list over a backend.
pub fn tools(backend: Arc<dyn KnowledgeBackend>) -> Result<ToolRegistry> {
    ToolRegistry::new()
        .with(
            ToolHandle::new(
                "retrieve_docs",
                "Retrieves music industry documents and enriches them with related entities \
                 from the music industry ontology.",
                Arc::new(RetrieveDocs(backend.clone())),
            )
            .param(ToolParam::required(
                "query",
                "The user's question or search query.",
            )),
        )?
        .with(
            ToolHandle::new(
                "search_music_ontology",
                "Search the DaisyAI music industry knowledge graph for entities, relationships, \
                 and classifications. Use this when you need to find connections between artists, \
                 genres, techniques, or industry concepts.",
                Arc::new(SearchOntology(backend)),
            )
            .param(ToolParam::required(
                "query",
                "Search term for music industry entities (artists, genres, techniques, etc.)",
            )),
        )
}

/// Build the agent descriptor.
pub fn descriptor(
    model: &str,
    instructions: &Instructions,
    backend: Arc<dyn KnowledgeBackend>,
) -> Result<AgentDescriptor> {
    Ok(AgentDescriptor::new(
        NAME,
        model,
        DESCRIPTION,
        instructions.resolve(NAME, INSTRUCTION),
        tools(backend)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EntityRecord, StaticGraph};
    use crate::retrieval::{Document, MemoryRetriever, TopNReranker};
    use serde_json::json;

    fn live(graph: GraphCapability) -> LiveKnowledge {
        let adapter = RetrievalAdapter::new(
            Arc::new(MemoryRetriever::new(
                vec![Document::new("1", "Sub Pop signed many grunge acts.")],
                10,
            )),
            Arc::new(TopNReranker::new(5)),
            graph.clone(),
        );
        LiveKnowledge::new(adapter, graph)
    }

    fn graph(entities: Vec<EntityRecord>) -> GraphCapability {
        GraphCapability::Available(Arc::new(StaticGraph::new(entities)))
    }

    #[tokio::test]
    async fn test_ontology_search_lists_entities() {
        let long = "x".repeat(200);
        let backend = live(graph(vec![
            StaticGraph::entity("Grunge", &["Genre"], Some(&long)),
            StaticGraph::entity("Grunge Revival", &["Genre", "Trend"], None),
        ]));

        let out = backend.search_ontology("grunge").await;
        let expected = format!(
            "🎯 Found 2 music industry entities matching 'grunge':\n\
             🎵 **Grunge** (Genre)\n   📝 {}...\n\
             🎵 **Grunge Revival** (Genre, Trend)\n\
             \n📊 **Source**: DaisyAI Music Industry Knowledge Graph",
            "x".repeat(150)
        );
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn test_ontology_search_degraded_paths() {
        let none = live(GraphCapability::unavailable("no uri"));
        assert!(none
            .search_ontology("grunge")
            .await
            .starts_with("🗃️ Music Industry Ontology temporarily unavailable."));

        let empty = live(graph(Vec::new()));
        assert_eq!(
            empty.search_ontology("polka").await,
            "🔍 No music industry entities found matching 'polka' in the ontology."
        );

        let failing = live(GraphCapability::Available(Arc::new(StaticGraph::failing(
            "timeout",
        ))));
        assert_eq!(
            failing.search_ontology("polka").await,
            "❌ Error searching music ontology: Knowledge graph error: timeout"
        );
    }

    #[tokio::test]
    async fn test_live_retrieve_docs_uses_adapter() {
        let out = live(GraphCapability::unavailable("no uri"))
            .retrieve_docs("grunge acts")
            .await;
        assert_eq!(
            out,
            "## Context provided:\n<Document 0>\nSub Pop signed many grunge acts.\n</Document 0>\n"
        );
    }

    #[tokio::test]
    async fn test_static_backend_names_data_store() {
        let settings = KnowledgeSettings {
            project_id: "demo-project".to_string(),
            data_store_id: "demo-store".to_string(),
            data_store_region: "eu".to_string(),
            ..KnowledgeSettings::default()
        };
        let registry = tools(Arc::new(StaticKnowledge::new(&settings))).unwrap();

        let out = registry
            .invoke("retrieve_docs", Some(&json!({"query": "A&R"})))
            .await
            .unwrap();
        assert!(out.starts_with("🎯 DaisyAI Knowledge Agent Results for: \"A&R\""));
        assert!(out.contains("- Project: demo-project\n- Data Store: demo-store\n- Region: eu"));

        let out = registry
            .invoke("search_music_ontology", Some(&json!({"query": "jazz"})))
            .await
            .unwrap();
        assert!(out.starts_with("🗃️ Music Industry Ontology Search: \"jazz\""));
    }

    #[test]
    fn test_tool_schema() {
        let registry = tools(Arc::new(StaticKnowledge::new(&KnowledgeSettings::default()))).unwrap();
        assert_eq!(registry.names(), vec!["retrieve_docs", "search_music_ontology"]);
        let schema = registry.get("retrieve_docs").unwrap().input_schema();
        assert_eq!(schema["required"], json!(["query"]));
    }
}
