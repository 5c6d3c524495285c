//! MCP server implementation.

use super::protocol::*;
use super::tools::{instruction_messages, instruction_prompt, list_tools};
use crate::agents::AgentDescriptor;
use crate::error::DaisyError;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server exposing one agent.
pub struct McpServer {
    agent: Arc<AgentDescriptor>,
}

impl McpServer {
    pub fn new(agent: Arc<AgentDescriptor>) -> Self {
        Self { agent }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        info!("Daisy MCP server starting for {}", self.agent.name());
        self.serve(stdin.lock(), stdout.lock()).await
    }

    /// Answer one JSON-RPC message per input line until EOF.
    pub async fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> anyhow::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                writeln!(writer, "{}", serde_json::to_string(&response)?)?;
                writer.flush()?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request. Notifications get no response.
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("MCP request: {}", request.method);

        if request.method.starts_with("notifications/") || request.method == "initialized" {
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::from_result(
                id,
                &ToolsListResult {
                    tools: list_tools(self.agent.tools()),
                },
            ),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "prompts/list" => JsonRpcResponse::from_result(
                id,
                &PromptsListResult {
                    prompts: vec![instruction_prompt(&self.agent)],
                },
            ),
            "prompts/get" => self.handle_prompts_get(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ListCapability { list_changed: false },
                prompts: ListCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: self.agent.name().to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: Some(self.agent.description().to_string()),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    /// Registry errors come back as `isError` results, not JSON-RPC errors.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, &message),
        };

        let result = match self
            .agent
            .tools()
            .invoke(&params.name, params.arguments.as_ref())
            .await
        {
            Ok(text) => ToolCallResult::text(text),
            Err(e @ (DaisyError::UnknownTool(_) | DaisyError::InvalidArguments(_))) => {
                ToolCallResult::error(e.to_string())
            }
            Err(e) => ToolCallResult::error(format!("Tool failed: {}", e)),
        };

        JsonRpcResponse::from_result(id, &result)
    }

    fn handle_prompts_get(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: PromptGetParams = match parse_params(params) {
            Ok(params) => params,
            Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, &message),
        };

        if params.name != self.agent.name() {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                &format!("Unknown prompt: {}", params.name),
            );
        }

        JsonRpcResponse::from_result(id, &instruction_messages(&self.agent))
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| format!("Invalid params: {}", e)),
        None => Err("Missing params".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{knowledge, talent};
    use crate::config::Instructions;

    fn server() -> McpServer {
        McpServer::new(Arc::new(
            talent::descriptor("gemini-2.0-flash", &Instructions::default()).unwrap(),
        ))
    }

    async fn exchange(server: &McpServer, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        server.serve(input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_and_notification() {
        let replies = exchange(
            &server(),
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n\
             {\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        )
        .await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(replies[0]["result"]["serverInfo"]["name"], "daisy_talent");
    }

    #[tokio::test]
    async fn test_tools_list_reflects_registry() {
        let replies = exchange(
            &server(),
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n",
        )
        .await;
        let names: Vec<&str> = replies[0]["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "discover_emerging_artists",
                "analyze_artist_potential",
                "track_industry_trends",
                "scout_venue_opportunities"
            ]
        );
        assert_eq!(
            replies[0]["result"]["tools"][0]["inputSchema"]["required"],
            json!(["genre"])
        );
    }

    #[tokio::test]
    async fn test_tools_call() {
        let replies = exchange(
            &server(),
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"tools/call\",\"params\":{\"name\":\"analyze_artist_potential\",\"arguments\":{\"artist_name\":\"Test Artist\"}}}\n",
        )
        .await;
        let text = replies[0]["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(text, talent::artist_report("Test Artist"));
        assert!(replies[0]["result"].get("isError").is_none());
    }

    #[tokio::test]
    async fn test_tools_call_errors_are_flagged() {
        let replies = exchange(
            &server(),
            "{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"tools/call\",\"params\":{\"name\":\"nope\"}}\n\
             {\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"tools/call\",\"params\":{\"name\":\"discover_emerging_artists\",\"arguments\":{}}}\n",
        )
        .await;
        assert_eq!(replies[0]["result"]["isError"], true);
        assert_eq!(replies[0]["result"]["content"][0]["text"], "Unknown tool: nope");
        assert_eq!(replies[1]["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_prompts() {
        let server = McpServer::new(Arc::new(
            knowledge::descriptor("gemini-2.0-flash", &Instructions::default()).unwrap(),
        ));
        let replies = exchange(
            &server,
            "{\"jsonrpc\":\"2.0\",\"id\":6,\"method\":\"prompts/list\"}\n\
             {\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"prompts/get\",\"params\":{\"name\":\"daisy_knowledge\"}}\n\
             {\"jsonrpc\":\"2.0\",\"id\":8,\"method\":\"prompts/get\",\"params\":{\"name\":\"other\"}}\n",
        )
        .await;
        assert_eq!(replies[0]["result"]["prompts"][0]["name"], "daisy_knowledge");
        assert!(replies[1]["result"]["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are DaisyAI Knowledge"));
        assert_eq!(replies[2]["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_parse_error_and_unknown_method() {
        let replies = exchange(
            &server(),
            "not json\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"resources/list\"}\n",
        )
        .await;
        assert_eq!(replies[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(replies[1]["error"]["code"], METHOD_NOT_FOUND);
    }
}
