//! Drives one conversation turn from user message to final answer.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::state::TurnState;
use crate::agent::engine::{Directive, ReasoningEngine};
use crate::agent::llm::{LlmError, Message, ToolCall};
use crate::agent::prompts::TOOL_USE_NUDGE;
use crate::agent::reasoning::{ReasoningLogger, ReasoningStepType};
use crate::agent::tools::{ToolContext, ToolError, ToolRegistry, ToolResult};
use crate::config::OrchestratorSettings;

/// Shown to the user when the tool budget runs out mid-request.
const BUDGET_EXHAUSTED_MESSAGE: &str =
    "I could not complete the request within the allowed number of tool calls. \
     Try asking for something more specific.";

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// One user request and everything that happened while answering it.
pub struct Turn {
    pub state: TurnState,
    /// Full conversation sent to the model, including tool traffic.
    pub transcript: Vec<Message>,
    /// Tool calls executed so far, counted against the budget.
    pub tool_calls_made: usize,
    /// Step-by-step trace for diagnostics.
    pub reasoning: ReasoningLogger,
    nudge_sent: bool,
}

impl Turn {
    fn new(system_prompt: &str, user_message: &str) -> Self {
        Self {
            state: TurnState::AwaitingModel,
            transcript: vec![Message::system(system_prompt), Message::user(user_message)],
            tool_calls_made: 0,
            reasoning: ReasoningLogger::new(),
            nudge_sent: false,
        }
    }

    /// The text to show the user, once the turn is terminal.
    pub fn final_message(&self) -> Option<&str> {
        match &self.state {
            TurnState::Done { answer } => Some(answer),
            TurnState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Repeatedly asks the engine for a directive and executes it.
///
/// Each turn is driven on the caller's task, one step at a time. Distinct
/// turns share nothing but the injected components, so concurrent
/// conversations cannot interleave their transcripts.
pub struct Orchestrator {
    engine: Arc<dyn ReasoningEngine>,
    tools: Arc<ToolRegistry>,
    ctx: ToolContext,
    max_tool_calls: usize,
    require_tool_use: bool,
    system_prompt: String,
}

impl Orchestrator {
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        tools: Arc<ToolRegistry>,
        ctx: ToolContext,
        settings: &OrchestratorSettings,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            tools,
            ctx,
            max_tool_calls: settings.max_tool_calls,
            require_tool_use: settings.require_tool_use,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn begin_turn(&self, user_message: &str) -> Turn {
        Turn::new(&self.system_prompt, user_message)
    }

    /// Runs a whole turn to its terminal state.
    pub async fn run_turn(&self, user_message: &str) -> Result<Turn, TurnError> {
        let mut turn = self.begin_turn(user_message);
        while turn.state.can_continue() {
            self.step(&mut turn).await?;
        }
        debug!(
            tool_calls = turn.tool_calls_made,
            steps = turn.reasoning.len(),
            "turn finished"
        );
        Ok(turn)
    }

    /// Advances the turn by one state transition.
    pub async fn step(&self, turn: &mut Turn) -> Result<(), TurnError> {
        match &turn.state {
            TurnState::AwaitingModel => self.await_model(turn).await,
            TurnState::ExecutingTool { call } => {
                let call = call.clone();
                self.execute_tool(turn, call).await;
                Ok(())
            }
            TurnState::Done { .. } | TurnState::Failed { .. } => {
                Err(TurnError::InvalidStateTransition(
                    "turn already finished".to_string(),
                ))
            }
        }
    }

    async fn await_model(&self, turn: &mut Turn) -> Result<(), TurnError> {
        turn.reasoning.start_timer();
        let definitions = self.tools.definitions();
        let directive = self.engine.next_step(&turn.transcript, &definitions).await?;

        match directive {
            Directive::FinalAnswer(answer) => {
                if self.require_tool_use && turn.tool_calls_made == 0 && !turn.nudge_sent {
                    // One corrective round; if the model insists, let it.
                    debug!("answer given without tool use, asking the model to check its data");
                    turn.reasoning.log(
                        ReasoningStepType::Decision,
                        "rejected answer produced without tool use",
                    );
                    turn.transcript.push(Message::assistant(&answer));
                    turn.transcript.push(Message::user(TOOL_USE_NUDGE));
                    turn.nudge_sent = true;
                    return Ok(());
                }
                turn.reasoning.log_with_elapsed(
                    ReasoningStepType::Decision,
                    format!("final answer: {}", truncate(&answer, 200)),
                );
                turn.transcript.push(Message::assistant(&answer));
                turn.state = TurnState::Done { answer };
            }
            Directive::ToolCall(call) => {
                if turn.tool_calls_made >= self.max_tool_calls {
                    // The over-budget call never runs.
                    warn!(
                        tool = %call.name,
                        budget = self.max_tool_calls,
                        "tool budget exhausted, failing the turn"
                    );
                    turn.reasoning.log(
                        ReasoningStepType::Error,
                        format!("budget exhausted before running '{}'", call.name),
                    );
                    turn.state = TurnState::Failed {
                        message: BUDGET_EXHAUSTED_MESSAGE.to_string(),
                    };
                    return Ok(());
                }
                turn.reasoning.log_with_metadata(
                    ReasoningStepType::ToolCall,
                    format!("model requested '{}'", call.name),
                    serde_json::json!({
                        "tool": call.name,
                        "arguments": call.arguments,
                    }),
                );
                turn.transcript.push(Message::assistant_with_tools("", vec![call.clone()]));
                turn.state = TurnState::ExecutingTool { call };
            }
        }
        Ok(())
    }

    async fn execute_tool(&self, turn: &mut Turn, call: ToolCall) {
        turn.tool_calls_made += 1;
        turn.reasoning.start_timer();

        let result = match self.tools.dispatch(&call.name, call.arguments.clone(), &self.ctx).await
        {
            Ok(value) => ToolResult::ok(&call.name, &value),
            Err(ToolError::Unrecoverable(message)) => {
                warn!(tool = %call.name, "unrecoverable tool failure: {message}");
                turn.reasoning.log(
                    ReasoningStepType::Error,
                    format!("'{}' failed without recovery: {message}", call.name),
                );
                turn.state = TurnState::Failed {
                    message: format!("I hit an internal problem and had to stop: {message}"),
                };
                return;
            }
            // Bad arguments, unknown tools and remote failures go back to the
            // model as failing observations so it can adjust.
            Err(e) => ToolResult::fail(&call.name, e),
        };

        turn.reasoning.log_with_elapsed(
            ReasoningStepType::ToolResult,
            format!(
                "'{}' {}: {}",
                call.name,
                if result.success { "succeeded" } else { "failed" },
                truncate(&result.content, 200)
            ),
        );
        turn.transcript
            .push(Message::tool_response(&call.id, &call.name, &result.content));
        turn.state = TurnState::AwaitingModel;
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len])
    }
}
