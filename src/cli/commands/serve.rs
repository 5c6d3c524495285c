//! HTTP API server for integration with other systems.
//!
//! Exposes the agent catalog and lets a remote runtime invoke tools.

use crate::agents::{AgentCatalog, AgentDescriptor};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::DaisyError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    catalog: AgentCatalog,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let catalog = AgentCatalog::bootstrap(&settings).await?;
    let app = router(catalog);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Daisy API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("List Agents", "GET  /agents");
    Output::kv("Get Agent", "GET  /agents/{name}");
    Output::kv("Call Tool", "POST /agents/{name}/tools/{tool}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(catalog: AgentCatalog) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/agents", get(list_agents))
        .route("/agents/{name}", get(get_agent))
        .route("/agents/{name}/tools/{tool}", post(call_tool))
        .layer(cors)
        .with_state(Arc::new(AppState { catalog }))
}

// === Response Types ===

#[derive(Serialize)]
struct AgentListResponse {
    agents: Vec<AgentSummary>,
    total: usize,
}

#[derive(Serialize)]
struct AgentSummary {
    name: String,
    model: String,
    description: String,
    tools: Vec<String>,
}

#[derive(Serialize)]
struct AgentDetailResponse {
    name: String,
    model: String,
    description: String,
    instruction: String,
    tools: Vec<ToolInfo>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Serialize)]
struct ToolCallResponse {
    agent: String,
    tool: String,
    result: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AgentSummary {
    fn from_descriptor(agent: &AgentDescriptor) -> Self {
        Self {
            name: agent.name().to_string(),
            model: agent.model_id().to_string(),
            description: agent.description().to_string(),
            tools: agent.tools().names().into_iter().map(String::from).collect(),
        }
    }
}

fn error_response(e: DaisyError) -> Response {
    let status = match e {
        DaisyError::UnknownAgent(_) | DaisyError::UnknownTool(_) => StatusCode::NOT_FOUND,
        DaisyError::InvalidArguments(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_agents(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let agents: Vec<AgentSummary> = state
        .catalog
        .iter()
        .map(|a| AgentSummary::from_descriptor(a))
        .collect();

    Json(AgentListResponse {
        total: agents.len(),
        agents,
    })
}

async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let agent = match state.catalog.get(&name) {
        Ok(agent) => agent,
        Err(e) => return error_response(e),
    };

    Json(AgentDetailResponse {
        name: agent.name().to_string(),
        model: agent.model_id().to_string(),
        description: agent.description().to_string(),
        instruction: agent.instruction().to_string(),
        tools: agent
            .tools()
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect(),
    })
    .into_response()
}

/// The body, if any, is the JSON object of tool arguments.
async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path((name, tool)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let agent = match state.catalog.get(&name) {
        Ok(agent) => agent,
        Err(e) => return error_response(e),
    };

    let args: Option<Value> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                return error_response(DaisyError::InvalidArguments(format!(
                    "Invalid JSON body: {}",
                    e
                )))
            }
        }
    };

    match agent.tools().invoke(&tool, args.as_ref()).await {
        Ok(result) => Json(ToolCallResponse {
            agent: name,
            tool,
            result,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::StaticKnowledge;
    use crate::config::{Instructions, KnowledgeSettings};

    fn state() -> Arc<AppState> {
        let catalog = AgentCatalog::build(
            "gemini-2.0-flash",
            &Instructions::default(),
            Arc::new(StaticKnowledge::new(&KnowledgeSettings::default())),
        )
        .unwrap();
        Arc::new(AppState { catalog })
    }

    #[tokio::test]
    async fn test_get_unknown_agent_is_404() {
        let response = get_agent(State(state()), Path("daisy_sync".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_agent() {
        let response = get_agent(State(state()), Path("daisy_talent".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let body = Bytes::from_static(br#"{"query": "streaming revenue"}"#);
        let response = call_tool(
            State(state()),
            Path((
                "daisy_knowledge".to_string(),
                "search_music_industry_knowledge".to_string(),
            )),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_call_tool_errors() {
        let missing = call_tool(
            State(state()),
            Path(("daisy_talent".to_string(), "scout_venue_opportunities".to_string())),
            Bytes::new(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let unknown = call_tool(
            State(state()),
            Path(("daisy_talent".to_string(), "sign_artist".to_string())),
            Bytes::new(),
        )
        .await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let malformed = call_tool(
            State(state()),
            Path(("daisy_talent".to_string(), "track_industry_trends".to_string())),
            Bytes::from_static(b"{oops"),
        )
        .await;
        assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_call_tool_without_body_uses_defaults() {
        let response = call_tool(
            State(state()),
            Path(("daisy_talent".to_string(), "track_industry_trends".to_string())),
            Bytes::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
