//! Retrieval pipeline: search, rerank, format, then optional graph enrichment.

use super::{format_docs, Reranker, Retriever};
use crate::error::{DaisyError, Result};
use crate::graph::{EntityRecord, GraphCapability};
use futures::future::try_join;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Entities appended to a document result.
pub const ENRICHMENT_LIMIT: usize = 5;

/// Turns a query into the knowledge hub's document context.
///
/// The graph is an enrichment source only: if it is unavailable or fails,
/// the document-only result is returned unchanged.
pub struct RetrievalAdapter {
    retriever: Arc<dyn Retriever>,
    reranker: Arc<dyn Reranker>,
    graph: GraphCapability,
}

impl RetrievalAdapter {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        reranker: Arc<dyn Reranker>,
        graph: GraphCapability,
    ) -> Self {
        Self {
            retriever,
            reranker,
            graph,
        }
    }

    /// Retrieve context for `query`. Never fails; retrieval errors are
    /// described in the returned text.
    ///
    /// The graph search runs alongside the document pipeline and is dropped
    /// as soon as the pipeline fails.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> String {
        let enrichment = async { Ok::<_, DaisyError>(self.ontology_context(query).await) };

        let (formatted, ontology) = match try_join(self.documents(query), enrichment).await {
            Ok(both) => both,
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                return format!(
                    "Calling retrieval tool with query:\n\n{}\n\nraised the following error:\n\n{}",
                    query, e
                );
            }
        };

        match ontology {
            Some(context) => {
                info!("Enhanced retrieval with ontology context");
                format!(
                    "{}{}\n\n📊 **Knowledge Sources**: Vertex AI Search + DaisyAI Music Industry Ontology",
                    formatted, context
                )
            }
            None => {
                info!("Standard document retrieval");
                formatted
            }
        }
    }

    async fn documents(&self, query: &str) -> Result<String> {
        let retrieved = self.retriever.invoke(query).await?;
        let ranked = self.reranker.compress(retrieved, query).await?;
        Ok(format_docs(&ranked))
    }

    async fn ontology_context(&self, query: &str) -> Option<String> {
        let client = self.graph.client()?;
        match client.search_entities(query, ENRICHMENT_LIMIT).await {
            Ok(response) if response.success => format_enrichment(&response.data),
            Ok(_) => None,
            Err(e) => {
                warn!("Ontology enrichment failed: {}", e);
                None
            }
        }
    }
}

fn format_enrichment(records: &[EntityRecord]) -> Option<String> {
    let lines: Vec<String> = records
        .iter()
        .filter(|r| r.is_displayable())
        .map(|r| {
            format!(
                "  • 🎵 {} ({})",
                r.name().unwrap_or("Unknown"),
                r.entity_types.join(", ")
            )
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(format!(
        "\n\n🗃️ **Music Industry Ontology** ({} entities):\n{}",
        lines.len(),
        lines.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphClient, GraphResponse, StaticGraph};
    use crate::retrieval::{Document, MemoryRetriever, TopNReranker};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct BrokenRetriever;

    #[async_trait]
    impl Retriever for BrokenRetriever {
        async fn invoke(&self, _query: &str) -> Result<Vec<Document>> {
            Err(DaisyError::Retrieval("data store offline".to_string()))
        }
    }

    struct BrokenReranker;

    #[async_trait]
    impl Reranker for BrokenReranker {
        async fn compress(&self, _documents: Vec<Document>, _query: &str) -> Result<Vec<Document>> {
            Err(DaisyError::Rerank("ranking model unavailable".to_string()))
        }
    }

    /// Counts searches and answers with a fixed response.
    struct CountingGraph {
        calls: AtomicUsize,
        success: bool,
    }

    impl CountingGraph {
        fn new(success: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                success,
            })
        }
    }

    #[async_trait]
    impl GraphClient for CountingGraph {
        async fn search_entities(&self, _query: &str, _limit: usize) -> Result<GraphResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GraphResponse {
                success: self.success,
                data: vec![StaticGraph::entity("Streaming", &["Topic"], None)],
            })
        }
    }

    fn adapter(graph: GraphCapability) -> RetrievalAdapter {
        let corpus = vec![
            Document::new("1", "Streaming accounts for most recorded music revenue."),
            Document::new("2", "Hyperpop blends genres."),
        ];
        RetrievalAdapter::new(
            Arc::new(MemoryRetriever::new(corpus, 10)),
            Arc::new(TopNReranker::new(5)),
            graph,
        )
    }

    fn graph() -> GraphCapability {
        GraphCapability::Available(Arc::new(StaticGraph::new(vec![
            StaticGraph::entity("Hyperpop", &["Genre", "Style"], None),
            StaticGraph::entity("Hyperpop Collective", &[], None),
        ])))
    }

    #[tokio::test]
    async fn test_retrieve_with_enrichment() {
        let out = adapter(graph()).retrieve("hyperpop").await;
        assert!(out.starts_with("## Context provided:\n<Document 0>\nHyperpop blends genres."));
        assert!(out.contains("🗃️ **Music Industry Ontology** (1 entities):\n  • 🎵 Hyperpop (Genre, Style)"));
        assert!(out.ends_with("Vertex AI Search + DaisyAI Music Industry Ontology"));
    }

    #[tokio::test]
    async fn test_graph_absence_and_failure_leave_documents_unchanged() {
        let plain = adapter(GraphCapability::unavailable("not configured"))
            .retrieve("streaming revenue")
            .await;
        let failing = adapter(GraphCapability::Available(Arc::new(StaticGraph::failing(
            "socket closed",
        ))))
        .retrieve("streaming revenue")
        .await;

        assert_eq!(plain, failing);
        assert!(plain.contains("Streaming accounts"));
        assert!(!plain.contains("Ontology"));
    }

    #[tokio::test]
    async fn test_no_matching_entities_means_no_enrichment() {
        let out = adapter(graph()).retrieve("streaming").await;
        assert!(!out.contains("Ontology"));
    }

    #[tokio::test]
    async fn test_retriever_failure_is_reported_as_text() {
        let adapter = RetrievalAdapter::new(
            Arc::new(BrokenRetriever),
            Arc::new(TopNReranker::new(5)),
            graph(),
        );
        let out = adapter.retrieve("labels").await;
        assert_eq!(
            out,
            "Calling retrieval tool with query:\n\nlabels\n\nraised the following error:\n\n\
             Document retrieval failed: data store offline"
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_graph_response_leaves_documents_unchanged() {
        let plain = adapter(GraphCapability::unavailable("not configured"))
            .retrieve("streaming revenue")
            .await;

        let graph = CountingGraph::new(false);
        let out = adapter(GraphCapability::Available(graph.clone()))
            .retrieve("streaming revenue")
            .await;

        assert_eq!(graph.calls.load(Ordering::SeqCst), 1);
        assert_eq!(out, plain);
    }

    #[tokio::test]
    async fn test_reranker_failure_is_reported_as_text() {
        let adapter = RetrievalAdapter::new(
            Arc::new(MemoryRetriever::new(vec![Document::new("1", "Streaming pays.")], 10)),
            Arc::new(BrokenReranker),
            GraphCapability::unavailable("not configured"),
        );
        let out = adapter.retrieve("streaming").await;
        assert_eq!(
            out,
            "Calling retrieval tool with query:\n\nstreaming\n\nraised the following error:\n\n\
             Document reranking failed: ranking model unavailable"
        );
    }

    #[tokio::test]
    async fn test_failed_retrieval_skips_graph_search() {
        let graph = CountingGraph::new(true);
        let adapter = RetrievalAdapter::new(
            Arc::new(BrokenRetriever),
            Arc::new(TopNReranker::new(5)),
            GraphCapability::Available(graph.clone()),
        );
        let out = adapter.retrieve("streaming").await;
        assert!(out.starts_with("Calling retrieval tool with query:"));
        assert_eq!(graph.calls.load(Ordering::SeqCst), 0);
    }
}
