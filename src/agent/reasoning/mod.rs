//! Diagnostic trace of agent activity.

mod logger;

pub use logger::{ReasoningLogger, ReasoningStep, ReasoningStepType};
