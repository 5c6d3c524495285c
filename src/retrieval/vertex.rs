//! Vertex AI Search (Discovery Engine) retriever and ranker.

use super::{Document, Reranker, Retriever};
use crate::config::KnowledgeSettings;
use crate::error::{DaisyError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding a pre-issued OAuth access token.
const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Where Google API access tokens come from.
#[derive(Debug, Clone)]
pub enum AccessTokenSource {
    /// A fixed token.
    Static(String),
    /// `gcloud auth print-access-token`, run per request.
    Gcloud,
}

impl AccessTokenSource {
    /// `GOOGLE_OAUTH_ACCESS_TOKEN` if set, else the gcloud CLI.
    pub fn from_env() -> Self {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => AccessTokenSource::Static(token),
            _ => AccessTokenSource::Gcloud,
        }
    }

    pub async fn token(&self) -> Result<String> {
        match self {
            AccessTokenSource::Static(token) => Ok(token.clone()),
            AccessTokenSource::Gcloud => {
                let output = tokio::process::Command::new("gcloud")
                    .args(["auth", "print-access-token"])
                    .output()
                    .await
                    .map_err(|e| DaisyError::Auth(format!("Could not run gcloud: {}", e)))?;

                if !output.status.success() {
                    return Err(DaisyError::Auth(
                        String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    ));
                }

                let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if token.is_empty() {
                    return Err(DaisyError::Auth("gcloud returned an empty token".to_string()));
                }
                Ok(token)
            }
        }
    }
}

/// Discovery Engine API host for a data store region.
fn discovery_host(region: &str) -> String {
    match region {
        "" | "global" => "https://discoveryengine.googleapis.com".to_string(),
        region => format!("https://{}-discoveryengine.googleapis.com", region),
    }
}

/// Vertex AI API host for a model location.
fn aiplatform_host(location: &str) -> String {
    match location {
        "" | "global" => "https://aiplatform.googleapis.com".to_string(),
        location => format!("https://{}-aiplatform.googleapis.com", location),
    }
}

fn http_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?)
}

async fn post_json<T: Serialize>(
    http: &reqwest::Client,
    url: &str,
    project_id: &str,
    token: &AccessTokenSource,
    body: &T,
    fail: fn(String) -> DaisyError,
) -> Result<Value> {
    let bearer = token.token().await?;
    let response = http
        .post(url)
        .bearer_auth(bearer)
        .header("x-goog-user-project", project_id)
        .json(body)
        .send()
        .await?;

    let status = response.status();
    let payload: Value = response.json().await?;
    if !status.is_success() {
        let message = payload["error"]["message"]
            .as_str()
            .unwrap_or("no error message")
            .to_string();
        return Err(fail(format!("HTTP {}: {}", status, message)));
    }
    Ok(payload)
}

/// Text embeddings from a Vertex AI publisher model.
pub struct VertexEmbedder {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    token: AccessTokenSource,
}

impl VertexEmbedder {
    pub fn new(settings: &KnowledgeSettings, token: AccessTokenSource) -> Result<Self> {
        let endpoint = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            aiplatform_host(&settings.location),
            settings.project_id,
            settings.location,
            settings.embedding_model,
        );

        Ok(Self {
            http: http_client(settings.timeout_seconds)?,
            endpoint,
            project_id: settings.project_id.clone(),
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self))]
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = json!({
            "instances": [{ "content": text, "task_type": "RETRIEVAL_QUERY" }]
        });
        let payload = post_json(
            &self.http,
            &self.endpoint,
            &self.project_id,
            &self.token,
            &body,
            DaisyError::Retrieval,
        )
        .await?;
        parse_embedding(&payload)
    }
}

fn parse_embedding(payload: &Value) -> Result<Vec<f32>> {
    payload["predictions"][0]["embeddings"]["values"]
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_f64)
                .map(|v| v as f32)
                .collect()
        })
        .ok_or_else(|| DaisyError::Retrieval("embedding response has no values".to_string()))
}

/// Retriever backed by a Discovery Engine data store.
///
/// With an embedding model configured, the query vector is sent alongside
/// the text so the store can score against its embedding column.
pub struct VertexSearchRetriever {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    max_documents: usize,
    embedding: Option<(VertexEmbedder, String)>,
    token: AccessTokenSource,
}

impl VertexSearchRetriever {
    pub fn new(settings: &KnowledgeSettings, token: AccessTokenSource) -> Result<Self> {
        if settings.project_id.trim().is_empty() {
            return Err(DaisyError::Config("knowledge.project_id is empty".to_string()));
        }
        if settings.data_store_id.trim().is_empty() {
            return Err(DaisyError::Config("knowledge.data_store_id is empty".to_string()));
        }

        let endpoint = format!(
            "{}/v1/projects/{}/locations/{}/collections/default_collection/dataStores/{}/servingConfigs/default_search:search",
            discovery_host(&settings.data_store_region),
            settings.project_id,
            settings.data_store_region,
            settings.data_store_id,
        );

        let embedding = if settings.embedding_model.trim().is_empty() {
            None
        } else {
            Some((
                VertexEmbedder::new(settings, token.clone())?,
                settings.embedding_column.clone(),
            ))
        };

        Ok(Self {
            http: http_client(settings.timeout_seconds)?,
            endpoint,
            project_id: settings.project_id.clone(),
            max_documents: settings.max_documents,
            embedding,
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn search_body(query: &str, page_size: usize, embedding: Option<(&str, &[f32])>) -> Value {
    let mut body = json!({
        "query": query,
        "pageSize": page_size,
        "contentSearchSpec": {
            "extractiveContentSpec": { "maxExtractiveSegmentCount": 1 },
            "snippetSpec": { "returnSnippet": true }
        }
    });
    if let Some((column, vector)) = embedding {
        body["embeddingSpec"] = json!({
            "embeddingVectors": [{ "fieldPath": column, "vector": vector }]
        });
    }
    body
}

#[async_trait]
impl Retriever for VertexSearchRetriever {
    #[instrument(skip(self))]
    async fn invoke(&self, query: &str) -> Result<Vec<Document>> {
        let vector = match &self.embedding {
            Some((embedder, column)) => Some((column.as_str(), embedder.embed(query).await?)),
            None => None,
        };
        let body = search_body(
            query,
            self.max_documents,
            vector.as_ref().map(|(column, v)| (*column, v.as_slice())),
        );

        let payload = post_json(
            &self.http,
            &self.endpoint,
            &self.project_id,
            &self.token,
            &body,
            DaisyError::Retrieval,
        )
        .await?;

        let documents: Vec<Document> = payload["results"]
            .as_array()
            .map(|results| results.iter().filter_map(parse_search_result).collect())
            .unwrap_or_default();

        debug!("Data store returned {} documents", documents.len());
        Ok(documents)
    }
}

/// Convert one search result into a document.
///
/// Unstructured stores put text in `derivedStructData`; structured stores
/// only carry `structData`, which is used verbatim as JSON.
fn parse_search_result(result: &Value) -> Option<Document> {
    let doc = result.get("document")?;
    let id = doc["id"].as_str().unwrap_or_default().to_string();
    let derived = &doc["derivedStructData"];

    let collect = |key: &str, field: &str| -> Option<String> {
        let parts: Vec<&str> = derived[key]
            .as_array()?
            .iter()
            .filter_map(|v| v[field].as_str())
            .collect();
        (!parts.is_empty()).then(|| parts.join("\n"))
    };

    let content = collect("extractive_segments", "content")
        .or_else(|| collect("extractive_answers", "content"))
        .or_else(|| collect("snippets", "snippet"))
        .or_else(|| {
            doc.get("structData")
                .filter(|v| !v.is_null())
                .map(Value::to_string)
        })?;

    Some(Document {
        id,
        title: derived["title"].as_str().map(str::to_string),
        content,
        uri: derived["link"].as_str().map(str::to_string),
        relevance_score: None,
    })
}

/// Reranker backed by the Discovery Engine ranking API.
pub struct VertexRanker {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    model: String,
    top_n: usize,
    token: AccessTokenSource,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankRequest<'a> {
    model: &'a str,
    query: &'a str,
    top_n: usize,
    records: Vec<RankRecord<'a>>,
}

#[derive(Serialize)]
struct RankRecord<'a> {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    content: &'a str,
}

#[derive(Deserialize)]
struct RankResponse {
    #[serde(default)]
    records: Vec<RankedRecord>,
}

#[derive(Deserialize)]
struct RankedRecord {
    id: String,
    #[serde(default)]
    score: Option<f32>,
}

impl VertexRanker {
    pub fn new(settings: &KnowledgeSettings, token: AccessTokenSource) -> Result<Self> {
        let endpoint = format!(
            "https://discoveryengine.googleapis.com/v1/projects/{}/locations/{}/rankingConfigs/default_ranking_config:rank",
            settings.project_id,
            if settings.location.is_empty() { "global" } else { settings.location.as_str() },
        );

        Ok(Self {
            http: http_client(settings.timeout_seconds)?,
            endpoint,
            project_id: settings.project_id.clone(),
            model: settings.ranking_model.clone(),
            top_n: settings.rerank_top_n,
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Reranker for VertexRanker {
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn compress(&self, documents: Vec<Document>, query: &str) -> Result<Vec<Document>> {
        if documents.is_empty() {
            return Ok(documents);
        }

        // Record ids are positions so duplicates from the store stay distinct.
        let request = RankRequest {
            model: &self.model,
            query,
            top_n: self.top_n,
            records: documents
                .iter()
                .enumerate()
                .map(|(i, d)| RankRecord {
                    id: i.to_string(),
                    title: d.title.as_deref(),
                    content: &d.content,
                })
                .collect(),
        };

        let payload = post_json(
            &self.http,
            &self.endpoint,
            &self.project_id,
            &self.token,
            &request,
            DaisyError::Rerank,
        )
        .await?;
        let ranked: RankResponse = serde_json::from_value(payload)?;

        Ok(apply_ranking(documents, ranked.records))
    }
}

/// Reorder `documents` by the ranking API's records, dropping the rest.
fn apply_ranking(documents: Vec<Document>, records: Vec<RankedRecord>) -> Vec<Document> {
    let mut by_id: HashMap<String, Document> = documents
        .into_iter()
        .enumerate()
        .map(|(i, d)| (i.to_string(), d))
        .collect();

    records
        .into_iter()
        .filter_map(|record| {
            let mut doc = by_id.remove(&record.id)?;
            doc.relevance_score = record.score;
            Some(doc)
        })
        .collect()
}
