//! Scripted reasoning engine for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use maestro::agent::{Directive, LlmError, Message, ReasoningEngine, ToolCall, ToolDefinition};

/// Plays back a fixed sequence of directives, one per model round.
///
/// Running past the end of the script fails the turn, which makes a test
/// with too few directives fail loudly instead of hanging.
pub struct ScriptedEngine {
    directives: Mutex<VecDeque<Directive>>,
}

impl ScriptedEngine {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self {
            directives: Mutex::new(directives.into()),
        }
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    async fn next_step(
        &self,
        _transcript: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<Directive, LlmError> {
        self.directives
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
    }
}

/// Directive ending the turn with a final answer.
pub fn answer(text: &str) -> Directive {
    Directive::FinalAnswer(text.to_string())
}

/// Directive requesting one tool call.
pub fn tool_call(name: &str, arguments: serde_json::Value) -> Directive {
    Directive::ToolCall(ToolCall::new(name, arguments))
}
