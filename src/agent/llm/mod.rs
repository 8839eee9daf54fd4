//! LLM provider abstraction.
//!
//! The reasoning engine talks to [`LlmProvider`] only; the concrete backend
//! is chosen at startup.

mod openai;
mod provider;
mod types;

pub use openai::{ApiKeySource, OpenAiProvider};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage, ToolCall};
