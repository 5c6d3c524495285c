//! MCP views of an agent's tools and instruction.

use super::protocol::{Content, Prompt, PromptGetResult, PromptMessage, Tool};
use crate::agents::AgentDescriptor;
use crate::tool::ToolRegistry;

/// One MCP tool per registered tool, in registry order.
pub fn list_tools(registry: &ToolRegistry) -> Vec<Tool> {
    registry
        .iter()
        .map(|tool| Tool {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

/// The agent's instruction, published as a prompt named after the agent.
pub fn instruction_prompt(agent: &AgentDescriptor) -> Prompt {
    Prompt {
        name: agent.name().to_string(),
        description: agent.description().to_string(),
    }
}

pub fn instruction_messages(agent: &AgentDescriptor) -> PromptGetResult {
    PromptGetResult {
        description: agent.description().to_string(),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: Content::Text {
                text: agent.instruction().to_string(),
            },
        }],
    }
}
