//! In-memory retriever and reranker.
//!
//! Useful for testing and offline runs.

use super::{Document, Reranker, Retriever};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Retriever over a fixed corpus, scored by query term overlap.
pub struct MemoryRetriever {
    documents: Vec<Document>,
    max_documents: usize,
}

impl MemoryRetriever {
    pub fn new(documents: Vec<Document>, max_documents: usize) -> Self {
        Self {
            documents,
            max_documents,
        }
    }
}

#[async_trait]
impl Retriever for MemoryRetriever {
    async fn invoke(&self, query: &str) -> Result<Vec<Document>> {
        let terms = terms(query);

        let mut scored: Vec<(usize, &Document)> = self
            .documents
            .iter()
            .map(|doc| {
                let haystack = terms_of(doc);
                (terms.intersection(&haystack).count(), doc)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(self.max_documents)
            .map(|(_, doc)| doc.clone())
            .collect())
    }
}

/// Reranker that keeps the first `top_n` documents and scores them by rank.
pub struct TopNReranker {
    top_n: usize,
}

impl TopNReranker {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

#[async_trait]
impl Reranker for TopNReranker {
    async fn compress(&self, documents: Vec<Document>, _query: &str) -> Result<Vec<Document>> {
        let kept = documents.len().min(self.top_n);
        Ok(documents
            .into_iter()
            .take(self.top_n)
            .enumerate()
            .map(|(rank, mut doc)| {
                doc.relevance_score = Some(1.0 - rank as f32 / kept as f32);
                doc
            })
            .collect())
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

fn terms_of(doc: &Document) -> HashSet<String> {
    let mut set = terms(&doc.content);
    if let Some(title) = &doc.title {
        set.extend(terms(title));
    }
    set
}
