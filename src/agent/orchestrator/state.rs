//! Turn state definitions.

use serde::{Deserialize, Serialize};

use crate::agent::llm::ToolCall;

/// State of one conversation turn.
///
/// A turn ping-pongs between `AwaitingModel` and `ExecutingTool` until the
/// model answers, the tool budget runs out, or something unrecoverable
/// happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TurnState {
    /// Waiting for the model's next directive.
    AwaitingModel,

    /// The model requested a tool call that has not run yet.
    ExecutingTool { call: ToolCall },

    /// The model produced its final answer.
    Done { answer: String },

    /// The turn ended without an answer.
    Failed { message: String },
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Done { .. } | TurnState::Failed { .. })
    }

    pub fn can_continue(&self) -> bool {
        !self.is_terminal()
    }
}
