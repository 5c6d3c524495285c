//! Neo4j client over the HTTP Query API.

use super::{EntityRecord, GraphClient, GraphResponse};
use crate::config::GraphSettings;
use crate::error::{DaisyError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Case-insensitive match on the usual naming properties.
const SEARCH_STATEMENT: &str = "MATCH (n) \
WHERE any(key IN ['name', 'title', 'label', 'comment'] \
WHERE toLower(toString(n[key])) CONTAINS toLower($query)) \
RETURN n, labels(n) AS entity_types \
LIMIT $limit";

/// Neo4j HTTP Query API client (`/db/{database}/query/v2`).
pub struct Neo4jClient {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    password: Option<String>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    statement: &'a str,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<QueryError>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl Neo4jClient {
    /// Build a client without contacting the server.
    pub fn new(uri: &str, settings: &GraphSettings) -> Result<Self> {
        let base = http_base(uri)?;
        let endpoint = base.join(&format!("db/{}/query/v2", settings.database))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    /// Build a client and verify connectivity with a trivial query.
    pub async fn connect(uri: &str, settings: &GraphSettings) -> Result<Self> {
        let client = Self::new(uri, settings)?;
        client.run("RETURN 1 AS ok", json!({})).await?;
        Ok(client)
    }

    async fn run(&self, statement: &str, parameters: Value) -> Result<QueryData> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(&self.username, self.password.as_deref())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&QueryRequest {
                statement,
                parameters,
            })
            .send()
            .await?;

        let status = response.status();
        let body: QueryResponse = response.json().await.map_err(|e| {
            DaisyError::Graph(format!("Unreadable response (HTTP {}): {}", status, e))
        })?;

        if let Some(err) = body.errors.first() {
            return Err(DaisyError::Graph(format!("{}: {}", err.code, err.message)));
        }
        if !status.is_success() {
            return Err(DaisyError::Graph(format!("HTTP {}", status)));
        }

        body.data
            .ok_or_else(|| DaisyError::Graph("Response carried no data".to_string()))
    }
}

#[async_trait]
impl GraphClient for Neo4jClient {
    #[instrument(skip(self))]
    async fn search_entities(&self, query: &str, limit: usize) -> Result<GraphResponse> {
        let data = self
            .run(SEARCH_STATEMENT, json!({ "query": query, "limit": limit }))
            .await?;

        let records = parse_records(&data);
        debug!("Graph search returned {} records", records.len());

        Ok(GraphResponse {
            success: true,
            data: records,
        })
    }
}

/// Map a driver-style URI to the HTTP base of the Query API.
///
/// `neo4j+s://` and `bolt+s://` use HTTPS on the default port, `neo4j://`
/// and `bolt://` use HTTP on 7474. `http(s)://` URIs pass through.
pub(crate) fn http_base(uri: &str) -> Result<Url> {
    let parsed = Url::parse(uri)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| DaisyError::Config(format!("Graph URI has no host: {}", uri)))?;

    let base = match parsed.scheme() {
        "http" | "https" => {
            let mut url = parsed.clone();
            url.set_query(None);
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            return Ok(url);
        }
        "neo4j+s" | "neo4j+ssc" | "bolt+s" | "bolt+ssc" => format!("https://{}/", host),
        "neo4j" | "bolt" => format!("http://{}:7474/", host),
        other => {
            return Err(DaisyError::Config(format!(
                "Unsupported graph URI scheme: {}",
                other
            )))
        }
    };

    Ok(Url::parse(&base)?)
}

/// Turn Query API rows into entity records.
///
/// Nodes arrive either as `{elementId, labels, properties}` objects or as a
/// bare property map, depending on the server's output format.
fn parse_records(data: &QueryData) -> Vec<EntityRecord> {
    let node_idx = data.fields.iter().position(|f| f == "n").unwrap_or(0);
    let types_idx = data.fields.iter().position(|f| f == "entity_types");

    data.values
        .iter()
        .filter_map(|row| {
            let node = row.get(node_idx)?;
            let (properties, node_labels) = match node.get("properties") {
                Some(Value::Object(props)) => (props.clone(), string_list(node.get("labels"))),
                _ => (node.as_object().cloned().unwrap_or_else(Map::new), Vec::new()),
            };

            let entity_types = match types_idx.and_then(|i| row.get(i)) {
                Some(types) => string_list(Some(types)),
                None => node_labels,
            };

            Some(EntityRecord::new(properties, entity_types))
        })
        .collect()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
