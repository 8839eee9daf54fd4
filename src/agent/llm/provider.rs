//! LLM provider trait definition.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{CompletionResponse, Message};
use crate::agent::tools::ToolDefinition;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Sampling temperature, kept low so tool arguments stay well-formed.
    pub temperature: f32,
    /// Maximum tokens to generate, backend default when unset.
    pub max_tokens: Option<u32>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors from a completion backend.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A chat completion backend.
///
/// One implementation per wire protocol; the reasoning engine and the
/// orchestrator never see backend specifics.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs (e.g. "openai").
    fn name(&self) -> &str;

    /// Model identifier requests are made with.
    fn model(&self) -> &str;

    /// Complete a conversation, optionally offering tools the model may call.
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), LlmError>;
}
