//! Reasoning step logger.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of reasoning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningStepType {
    /// Model deliberation.
    Thought,
    /// A tool call the model requested.
    ToolCall,
    /// What the tool returned.
    ToolResult,
    /// A routing decision by the orchestrator.
    Decision,
    /// Something went wrong.
    Error,
}

/// One entry in a turn's reasoning trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub id: String,
    /// Position within the turn, 0-indexed.
    pub step_number: u32,
    /// Unix timestamp (milliseconds).
    pub timestamp: i64,
    pub step_type: ReasoningStepType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

impl ReasoningStep {
    pub fn new(step_number: u32, step_type: ReasoningStepType, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            step_number,
            timestamp: chrono::Utc::now().timestamp_millis(),
            step_type,
            content: content.into(),
            metadata: None,
            duration_ms: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Accumulates the trace of a turn as it executes.
///
/// The trace is diagnostic output: it explains what the agent did without
/// replaying the whole transcript.
pub struct ReasoningLogger {
    steps: Vec<ReasoningStep>,
    step_counter: AtomicU64,
    current_timer: Option<Instant>,
}

impl ReasoningLogger {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            step_counter: AtomicU64::new(0),
            current_timer: None,
        }
    }

    pub fn log(&mut self, step_type: ReasoningStepType, content: impl Into<String>) {
        let step_number = self.next_number();
        self.steps.push(ReasoningStep::new(step_number, step_type, content));
    }

    pub fn log_with_metadata(
        &mut self,
        step_type: ReasoningStepType,
        content: impl Into<String>,
        metadata: serde_json::Value,
    ) {
        let step_number = self.next_number();
        self.steps
            .push(ReasoningStep::new(step_number, step_type, content).with_metadata(metadata));
    }

    /// Arms a timer that the next `log_with_elapsed` call will consume.
    pub fn start_timer(&mut self) {
        self.current_timer = Some(Instant::now());
    }

    pub fn log_with_elapsed(&mut self, step_type: ReasoningStepType, content: impl Into<String>) {
        let step_number = self.next_number();
        let mut step = ReasoningStep::new(step_number, step_type, content);
        if let Some(start) = self.current_timer.take() {
            step.duration_ms = Some(start.elapsed().as_millis() as i64);
        }
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn next_number(&self) -> u32 {
        self.step_counter.fetch_add(1, Ordering::SeqCst) as u32
    }
}

impl Default for ReasoningLogger {
    fn default() -> Self {
        Self::new()
    }
}
