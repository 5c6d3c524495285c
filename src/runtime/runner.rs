//! Tool-calling loop for one agent descriptor.

use super::{create_client, tool_definitions};
use crate::agents::AgentDescriptor;
use crate::config::RuntimeSettings;
use crate::error::{DaisyError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use std::sync::Arc;
use tracing::{debug, info};

/// Drives an agent through an OpenAI-compatible chat endpoint.
pub struct Runner {
    client: Client<OpenAIConfig>,
    agent: Arc<AgentDescriptor>,
    model: String,
    max_iterations: usize,
}

impl Runner {
    pub fn new(agent: Arc<AgentDescriptor>, settings: &RuntimeSettings) -> Result<Self> {
        Ok(Self::with_client(agent, create_client(settings)?)
            .with_max_iterations(settings.max_iterations))
    }

    pub fn with_client(agent: Arc<AgentDescriptor>, client: Client<OpenAIConfig>) -> Self {
        Self {
            client,
            model: agent.model_id().to_string(),
            agent,
            max_iterations: 15,
        }
    }

    /// Use a different model than the descriptor names.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the agent once with a user task.
    pub async fn run(&self, task: &str) -> Result<AgentResponse> {
        let mut messages = vec![self.system_message()?];
        messages.push(user_message(task)?);
        self.complete(&mut messages).await
    }

    pub(crate) fn system_message(&self) -> Result<ChatCompletionRequestMessage> {
        Ok(ChatCompletionRequestSystemMessageArgs::default()
            .content(self.agent.instruction())
            .build()
            .map_err(|e| DaisyError::Runtime(e.to_string()))?
            .into())
    }

    /// Call the model until it answers without tool calls, extending
    /// `messages` with every exchange.
    pub(crate) async fn complete(
        &self,
        messages: &mut Vec<ChatCompletionRequestMessage>,
    ) -> Result<AgentResponse> {
        let tools = tool_definitions(self.agent.tools());
        let mut tool_calls_made = Vec::new();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(DaisyError::Runtime(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("{} iteration {}", self.agent.name(), iterations);

            let mut request = CreateChatCompletionRequestArgs::default();
            request
                .model(&self.model)
                .messages(messages.clone());
            if !tools.is_empty() {
                request.tools(tools.clone());
            }
            let request = request
                .build()
                .map_err(|e| DaisyError::Runtime(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| DaisyError::OpenAI(format!("Chat API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| DaisyError::Runtime("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();
                    messages.push(assistant_message(&content)?);
                    return Ok(AgentResponse {
                        content,
                        tool_calls: tool_calls_made,
                        iterations,
                    });
                }
            };

            messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| DaisyError::Runtime(e.to_string()))?
                    .into(),
            );

            for tool_call in tool_calls {
                let record = execute_tool_call(&self.agent, tool_call).await;

                messages.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| DaisyError::Runtime(e.to_string()))?
                        .into(),
                );

                tool_calls_made.push(record);
            }
        }
    }
}

pub(crate) fn user_message(content: &str) -> Result<ChatCompletionRequestMessage> {
    Ok(ChatCompletionRequestUserMessageArgs::default()
        .content(content)
        .build()
        .map_err(|e| DaisyError::Runtime(e.to_string()))?
        .into())
}

pub(crate) fn assistant_message(content: &str) -> Result<ChatCompletionRequestMessage> {
    Ok(ChatCompletionRequestAssistantMessageArgs::default()
        .content(content)
        .build()
        .map_err(|e| DaisyError::Runtime(e.to_string()))?
        .into())
}

/// Execute a single tool call. Registry errors become the tool result so
/// the model can correct itself.
pub(crate) async fn execute_tool_call(
    agent: &AgentDescriptor,
    tool_call: &ChatCompletionMessageToolCall,
) -> ToolCallRecord {
    let name = &tool_call.function.name;
    let arguments = &tool_call.function.arguments;

    info!("{} calling tool: {} with args: {}", agent.name(), name, arguments);

    let (result, ok) = match agent.tools().invoke_json(name, arguments).await {
        Ok(output) => (output, true),
        Err(e) => (format!("Tool error: {}", e), false),
    };

    ToolCallRecord {
        name: name.clone(),
        arguments: arguments.clone(),
        result,
        ok,
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
    /// False when the registry rejected the call.
    pub ok: bool,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::knowledge;
    use crate::config::Instructions;
    use async_openai::types::{ChatCompletionToolType, FunctionCall};

    fn call(name: &str, arguments: &str) -> ChatCompletionMessageToolCall {
        ChatCompletionMessageToolCall {
            id: "call_1".to_string(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn agent() -> AgentDescriptor {
        knowledge::descriptor("gemini-2.0-flash", &Instructions::default()).unwrap()
    }

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "search_music_industry_knowledge".to_string(),
            arguments: r#"{"query": "sync"}"#.to_string(),
            result: "Music Licensing".to_string(),
            ok: true,
        };
        assert_eq!(
            format!("{}", record),
            r#"search_music_industry_knowledge({"query": "sync"})"#
        );
    }

    #[tokio::test]
    async fn test_execute_tool_call() {
        let record = execute_tool_call(
            &agent(),
            &call("search_music_industry_knowledge", r#"{"query": "spotify payouts"}"#),
        )
        .await;
        assert!(record.ok);
        assert_eq!(record.result, knowledge::STREAMING_INSIGHTS);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_reports_error_text() {
        let record = execute_tool_call(&agent(), &call("book_flight", "{}")).await;
        assert!(!record.ok);
        assert_eq!(record.result, "Tool error: Unknown tool: book_flight");
    }

    #[tokio::test]
    async fn test_execute_bad_arguments_reports_error_text() {
        let record = execute_tool_call(
            &agent(),
            &call("search_music_industry_knowledge", "{not json"),
        )
        .await;
        assert!(!record.ok);
        assert!(record.result.starts_with("Tool error: Invalid tool arguments:"));
    }
}
