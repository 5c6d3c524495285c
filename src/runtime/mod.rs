//! Local agent runtime.
//!
//! Drives an [`AgentDescriptor`](crate::agents::AgentDescriptor) through an
//! OpenAI-compatible chat-completions endpoint: the model picks a tool, the
//! tool runs, its text goes back into the conversation.

mod client;
mod runner;
mod session;

pub use client::{create_client, create_client_with_key};
pub use runner::{AgentResponse, Runner, ToolCallRecord};
pub use session::ChatSession;

use crate::tool::ToolRegistry;
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

/// Function definitions for every tool in `registry`, in order.
pub fn tool_definitions(registry: &ToolRegistry) -> Vec<ChatCompletionTool> {
    registry
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()),
                parameters: Some(tool.input_schema()),
                strict: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::talent;
    use serde_json::json;

    #[test]
    fn test_tool_definitions_follow_registry() {
        let registry = talent::tools().unwrap();
        let defs = tool_definitions(&registry);
        let names: Vec<&str> = defs.iter().map(|d| d.function.name.as_str()).collect();
        assert_eq!(names, registry.names());

        let venues = &defs[3].function;
        let params = venues.parameters.as_ref().unwrap();
        assert_eq!(params["required"], json!(["artist_level"]));
        assert_eq!(params["properties"]["region"]["default"], json!("North America"));
    }
}
