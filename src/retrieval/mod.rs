//! Document retrieval for the knowledge hub.
//!
//! Provides trait-based interfaces for the external document retriever and
//! reranker, plus the adapter that turns their output into tool text.

mod adapter;
mod memory;
mod vertex;

pub use adapter::RetrievalAdapter;
pub use memory::{MemoryRetriever, TopNReranker};
pub use vertex::{AccessTokenSource, VertexEmbedder, VertexRanker, VertexSearchRetriever};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A retrieved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned by the data store.
    pub id: String,
    /// Document title, if the store provides one.
    pub title: Option<String>,
    /// Text content used as context.
    pub content: String,
    /// Link to the source document.
    pub uri: Option<String>,
    /// Relevance score set by the reranker.
    pub relevance_score: Option<f32>,
}

impl Document {
    /// Create a document with no title, link, or score.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: content.into(),
            uri: None,
            relevance_score: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// External document search service.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return ranked documents for a query.
    async fn invoke(&self, query: &str) -> Result<Vec<Document>>;
}

/// External relevance reranking service.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Reorder or filter `documents` by relevance to `query`.
    async fn compress(&self, documents: Vec<Document>, query: &str) -> Result<Vec<Document>>;
}

/// Render documents as the context block handed back to the model.
pub fn format_docs(documents: &[Document]) -> String {
    let mut out = String::from("## Context provided:\n");
    for (i, doc) in documents.iter().enumerate() {
        out.push_str(&format!(
            "<Document {i}>\n{}\n</Document {i}>\n",
            doc.content.trim()
        ));
    }
    out
}
