//! Reasoning engine: decides the next move for a conversation turn.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::llm::{CompletionOptions, FinishReason, LlmError, LlmProvider, Message, ToolCall};
use super::tools::ToolDefinition;

/// What the model wants to do next: answer the user, or run one tool.
#[derive(Debug, Clone)]
pub enum Directive {
    FinalAnswer(String),
    ToolCall(ToolCall),
}

/// Produces the next [`Directive`] from the transcript so far.
///
/// The orchestrator owns the loop and the budget; the engine owns the model
/// interaction. Tests script this trait directly instead of faking a chat
/// completion backend.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn next_step(
        &self,
        transcript: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Directive, LlmError>;
}

/// Engine backed by a chat completion provider.
pub struct LlmReasoningEngine {
    provider: Arc<dyn LlmProvider>,
    options: CompletionOptions,
}

impl LlmReasoningEngine {
    pub fn new(provider: Arc<dyn LlmProvider>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }
}

#[async_trait]
impl ReasoningEngine for LlmReasoningEngine {
    async fn next_step(
        &self,
        transcript: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<Directive, LlmError> {
        let offered = if tools.is_empty() { None } else { Some(tools) };
        let response = self.provider.complete(transcript, offered, &self.options).await?;

        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion finished"
            );
        }
        if response.finish_reason == FinishReason::MaxTokens {
            warn!(model = %self.provider.model(), "completion was cut off at the token limit");
        }

        let mut calls = response.message.tool_calls.unwrap_or_default();
        if !calls.is_empty() {
            // One tool call per step keeps observations attributable; extra
            // requests are dropped and the model re-asks if it still wants them.
            if calls.len() > 1 {
                warn!(
                    dropped = calls.len() - 1,
                    "model requested multiple tool calls, keeping the first"
                );
                calls.truncate(1);
            }
            return Ok(Directive::ToolCall(calls.remove(0)));
        }

        let answer = response.message.content;
        if answer.trim().is_empty() {
            return Err(LlmError::InvalidResponse(
                "model produced neither an answer nor a tool call".to_string(),
            ));
        }
        Ok(Directive::FinalAnswer(answer))
    }
}
