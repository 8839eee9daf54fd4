//! LLM-driven agent loop.
//!
//! The pieces, outside in:
//! - [`orchestrator`]: the turn state machine; owns the budget and transcript
//! - [`engine`]: turns a transcript into the next directive via the model
//! - [`tools`]: the capabilities the model may invoke
//! - [`llm`]: chat completion backends
//! - [`reasoning`]: per-turn diagnostic trace

pub mod engine;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod reasoning;
pub mod tools;

pub use engine::{Directive, LlmReasoningEngine, ReasoningEngine};
pub use llm::{
    CompletionOptions, LlmError, LlmProvider, Message, MessageRole, OpenAiProvider, ToolCall,
};
pub use orchestrator::{Orchestrator, Turn, TurnError, TurnState};
pub use reasoning::{ReasoningLogger, ReasoningStep, ReasoningStepType};
pub use tools::{
    default_registry, AgentTool, ToolContext, ToolDefinition, ToolError, ToolRegistry, ToolResult,
};
