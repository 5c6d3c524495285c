//! Configuration settings for Daisy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure.
///
/// Loaded once at startup (file first, then environment overrides) and never
/// mutated afterwards. Nothing here writes back to the process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub agents: AgentSettings,
    pub knowledge: KnowledgeSettings,
    pub graph: GraphSettings,
    pub runtime: RuntimeSettings,
    pub instructions: InstructionSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Settings shared by every agent descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Model identifier handed to the agent runtime.
    pub model: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Which backend answers the knowledge hub's tools.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeMode {
    /// Pre-written results describing the configured data store.
    #[default]
    Static,
    /// Managed document search, reranking, and knowledge graph enrichment.
    Live,
}

impl std::str::FromStr for KnowledgeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" | "mock" => Ok(KnowledgeMode::Static),
            "live" | "vertex" => Ok(KnowledgeMode::Live),
            _ => Err(format!("Unknown knowledge mode: {}", s)),
        }
    }
}

impl std::fmt::Display for KnowledgeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeMode::Static => write!(f, "static"),
            KnowledgeMode::Live => write!(f, "live"),
        }
    }
}

/// Document search settings for the knowledge hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    /// Backend selection (static, live).
    pub mode: KnowledgeMode,
    /// Cloud project hosting the data store.
    pub project_id: String,
    /// Location used for model calls and ranking.
    pub location: String,
    /// Search data store identifier.
    pub data_store_id: String,
    /// Search data store region (us, eu, global).
    pub data_store_region: String,
    /// Model embedding the query for vector scoring; empty disables it.
    pub embedding_model: String,
    /// Column holding document embeddings.
    pub embedding_column: String,
    /// Maximum documents fetched per query.
    pub max_documents: usize,
    /// Ranking model used to rerank retrieved documents.
    pub ranking_model: String,
    /// Documents kept after reranking.
    pub rerank_top_n: usize,
    /// Timeout for search and ranking requests.
    pub timeout_seconds: u64,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            mode: KnowledgeMode::Static,
            project_id: "daisy-ai-staging".to_string(),
            location: "global".to_string(),
            data_store_id: "daisy-knowledge-datastore".to_string(),
            data_store_region: "us".to_string(),
            embedding_model: "text-embedding-005".to_string(),
            embedding_column: "embedding".to_string(),
            max_documents: 10,
            ranking_model: "semantic-ranker-512@latest".to_string(),
            rerank_top_n: 5,
            timeout_seconds: 30,
        }
    }
}

/// Knowledge graph (Neo4j) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Try to connect to the graph at startup.
    pub enabled: bool,
    /// Connection URI (neo4j+s://, neo4j://, bolt://, http(s)://).
    pub uri: Option<String>,
    /// Username for basic auth.
    pub username: String,
    /// Password for basic auth.
    pub password: Option<String>,
    /// Database name.
    pub database: String,
    /// Timeout for graph queries.
    pub timeout_seconds: u64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            uri: None,
            username: "neo4j".to_string(),
            password: None,
            database: "neo4j".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Settings for the local tool-calling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// OpenAI-compatible chat completions base URL.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Maximum model calls per task.
    pub max_iterations: usize,
    /// Request timeout.
    pub timeout_seconds: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            max_iterations: 15,
            timeout_seconds: 300,
        }
    }
}

/// Agent instruction customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct InstructionSettings {
    /// Directory with `<agent_name>.toml` overrides.
    pub custom_dir: Option<String>,
    /// Variables available in all instructions as {{variable_name}}.
    pub variables: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None,
    /// then overlay the process environment.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.with_env(|key| std::env::var(key).ok())
    }

    /// Overlay environment values read through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn with_env<F>(mut self, lookup: F) -> crate::error::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("DATA_STORE_ID") {
            self.knowledge.data_store_id = v;
        }
        if let Some(v) = get("DATA_STORE_REGION") {
            self.knowledge.data_store_region = v;
        }
        if let Some(v) = get("PROJECT_ID").or_else(|| get("GOOGLE_CLOUD_PROJECT")) {
            self.knowledge.project_id = v;
        }
        if let Some(v) = get("GOOGLE_CLOUD_LOCATION") {
            self.knowledge.location = v;
        }
        if let Some(v) = get("DAISY_KNOWLEDGE_MODE") {
            self.knowledge.mode = v
                .parse()
                .map_err(crate::error::DaisyError::Config)?;
        }
        if let Some(v) = get("NEO4J_URI") {
            self.graph.uri = Some(v);
        }
        if let Some(v) = get("NEO4J_USERNAME") {
            self.graph.username = v;
        }
        if let Some(v) = get("NEO4J_PASSWORD") {
            self.graph.password = Some(v);
        }
        if let Some(v) = get("NEO4J_DATABASE") {
            self.graph.database = v;
        }

        Ok(self)
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::DaisyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daisy")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded instruction override directory, if configured.
    pub fn instructions_dir(&self) -> Option<PathBuf> {
        self.instructions.custom_dir.as_deref().map(Self::expand_path)
    }
}
