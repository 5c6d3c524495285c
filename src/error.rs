//! Error types for Daisy.

use thiserror::Error;

/// Library-level error type for Daisy operations.
#[derive(Error, Debug)]
pub enum DaisyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document retrieval failed: {0}")]
    Retrieval(String),

    #[error("Document reranking failed: {0}")]
    Rerank(String),

    #[error("Knowledge graph error: {0}")]
    Graph(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Agent runtime error: {0}")]
    Runtime(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for Daisy operations.
pub type Result<T> = std::result::Result<T, DaisyError>;
