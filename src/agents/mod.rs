//! Agent descriptors for the DaisyAI music-industry agents.
//!
//! Each agent is a fixed bundle of model id, instruction and tools, built
//! once at startup from [`Settings`] and never changed afterwards. An agent
//! runtime (the local tool loop, the MCP server, or the HTTP API) reads the
//! descriptor and invokes its tools by name.

pub mod hub;
pub mod knowledge;
pub mod talent;

pub use hub::{KnowledgeBackend, LiveKnowledge, StaticKnowledge};

use crate::config::{Instructions, KnowledgeMode, Settings};
use crate::error::{DaisyError, Result};
use crate::graph::GraphCapability;
use crate::retrieval::{AccessTokenSource, RetrievalAdapter, VertexRanker, VertexSearchRetriever};
use crate::tool::ToolRegistry;
use std::sync::Arc;
use tracing::info;

/// Everything an agent runtime needs to drive one agent.
#[derive(Debug)]
pub struct AgentDescriptor {
    name: String,
    model_id: String,
    description: String,
    instruction: String,
    tools: ToolRegistry,
}

impl AgentDescriptor {
    pub fn new(
        name: &str,
        model_id: &str,
        description: &str,
        instruction: String,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            name: name.to_string(),
            model_id: model_id.to_string(),
            description: description.to_string(),
            instruction,
            tools,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

/// The agents available to this process, in a fixed order.
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    agents: Vec<Arc<AgentDescriptor>>,
}

impl AgentCatalog {
    /// Build every descriptor from settings.
    ///
    /// The knowledge graph is optional and degrades to `Unavailable`. Live
    /// retrieval is required once selected: a bad retriever configuration
    /// fails here.
    pub async fn bootstrap(settings: &Settings) -> Result<Self> {
        let instructions = Instructions::load(
            settings.instructions_dir().as_deref(),
            &settings.instructions.variables,
        )?;

        let backend: Arc<dyn KnowledgeBackend> = match settings.knowledge.mode {
            KnowledgeMode::Static => {
                info!("Knowledge hub using static results");
                Arc::new(StaticKnowledge::new(&settings.knowledge))
            }
            KnowledgeMode::Live => {
                let graph = GraphCapability::resolve(&settings.graph).await;
                let token = AccessTokenSource::from_env();
                let retriever = VertexSearchRetriever::new(&settings.knowledge, token.clone())?;
                let ranker = VertexRanker::new(&settings.knowledge, token)?;
                info!(
                    "Knowledge hub using {} (graph: {:?})",
                    retriever.endpoint(),
                    graph
                );
                let adapter =
                    RetrievalAdapter::new(Arc::new(retriever), Arc::new(ranker), graph.clone());
                Arc::new(LiveKnowledge::new(adapter, graph))
            }
        };

        Self::build(&settings.agents.model, &instructions, backend)
    }

    /// Build the catalog around an already chosen knowledge backend.
    pub fn build(
        model: &str,
        instructions: &Instructions,
        backend: Arc<dyn KnowledgeBackend>,
    ) -> Result<Self> {
        let agents = vec![
            knowledge::descriptor(model, instructions)?,
            talent::descriptor(model, instructions)?,
            hub::descriptor(model, instructions, backend)?,
        ];

        Ok(Self {
            agents: agents.into_iter().map(Arc::new).collect(),
        })
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Result<Arc<AgentDescriptor>> {
        self.agents
            .iter()
            .find(|a| a.name() == name)
            .cloned()
            .ok_or_else(|| DaisyError::UnknownAgent(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AgentDescriptor>> {
        self.agents.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KnowledgeSettings;
    use std::collections::HashMap;

    fn catalog() -> AgentCatalog {
        AgentCatalog::build(
            "gemini-2.0-flash",
            &Instructions::default(),
            Arc::new(StaticKnowledge::new(&KnowledgeSettings::default())),
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_order_and_lookup() {
        let catalog = catalog();
        assert_eq!(
            catalog.names(),
            vec!["daisy_knowledge", "daisy_talent", "daisy_knowledge_hub"]
        );

        let talent = catalog.get("daisy_talent").unwrap();
        assert_eq!(talent.model_id(), "gemini-2.0-flash");
        assert_eq!(talent.tools().len(), 4);
        assert!(talent.instruction().starts_with("You are Daisy Talent"));
    }

    #[test]
    fn test_unknown_agent() {
        let err = catalog().get("daisy_sync").unwrap_err();
        assert!(matches!(err, DaisyError::UnknownAgent(name) if name == "daisy_sync"));
    }

    #[test]
    fn test_instruction_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("daisy_knowledge.toml"),
            "instruction = \"You advise {{label}} staff.\"\n",
        )
        .unwrap();
        let mut vars = HashMap::new();
        vars.insert("label".to_string(), "Sub Pop".to_string());
        let instructions = Instructions::load(Some(dir.path()), &vars).unwrap();

        let catalog = AgentCatalog::build(
            "gemini-2.0-flash",
            &instructions,
            Arc::new(StaticKnowledge::new(&KnowledgeSettings::default())),
        )
        .unwrap();

        assert_eq!(
            catalog.get("daisy_knowledge").unwrap().instruction(),
            "You advise Sub Pop staff."
        );
        assert!(catalog
            .get("daisy_talent")
            .unwrap()
            .instruction()
            .starts_with("You are Daisy Talent"));
    }

    #[tokio::test]
    async fn test_bootstrap_static_mode() {
        let catalog = AgentCatalog::bootstrap(&Settings::default()).await.unwrap();
        let hub = catalog.get("daisy_knowledge_hub").unwrap();
        let out = hub
            .tools()
            .invoke("retrieve_docs", Some(&serde_json::json!({"query": "A&R"})))
            .await
            .unwrap();
        assert!(out.contains("- Data Store: daisy-knowledge-datastore"));
    }
}
