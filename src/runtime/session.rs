//! Multi-turn conversation with an agent.

use super::runner::{user_message, AgentResponse, Runner};
use crate::error::Result;
use async_openai::types::ChatCompletionRequestMessage;

/// Messages kept after trimming, including the system message.
const MAX_HISTORY: usize = 30;

/// A conversation that remembers earlier turns.
pub struct ChatSession {
    runner: Runner,
    messages: Vec<ChatCompletionRequestMessage>,
}

impl ChatSession {
    pub fn new(runner: Runner) -> Result<Self> {
        let system = runner.system_message()?;
        Ok(Self {
            runner,
            messages: vec![system],
        })
    }

    pub fn agent_name(&self) -> &str {
        self.runner.agent().name()
    }

    /// Clear conversation history (keeps the instruction).
    pub fn clear_history(&mut self) {
        self.messages.truncate(1);
    }

    pub fn history_len(&self) -> usize {
        self.messages.len()
    }

    /// Send a message and get a response, handling tool calls.
    pub async fn send_message(&mut self, input: &str) -> Result<AgentResponse> {
        self.messages.push(user_message(input)?);
        let response = self.runner.complete(&mut self.messages).await?;
        trim_history(&mut self.messages, MAX_HISTORY);
        Ok(response)
    }
}

/// Keep the first message and at most the last `max - 1`.
///
/// The kept tail starts at a user message, so a tool result never outlives
/// the assistant message that requested it. A single turn longer than the
/// window is cut after its leading tool results instead.
fn trim_history(messages: &mut Vec<ChatCompletionRequestMessage>, max: usize) {
    if messages.len() <= max {
        return;
    }

    let cut = messages.len() - (max - 1);
    let tail = &messages[cut..];
    let offset = tail
        .iter()
        .position(|m| matches!(m, ChatCompletionRequestMessage::User(_)))
        .or_else(|| {
            tail.iter()
                .position(|m| !matches!(m, ChatCompletionRequestMessage::Tool(_)))
        })
        .unwrap_or(tail.len());

    messages.drain(1..cut + offset);
}
