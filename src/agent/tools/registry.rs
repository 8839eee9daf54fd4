//! Tool definitions, dispatch and argument validation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::context::ToolContext;

/// A tool as advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique within a registry.
    pub name: String,
    /// What the model reads to decide when to call this.
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// A tool that takes no arguments.
    pub fn no_params(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            description,
            serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }

    /// Checks `args` against the parameter schema before the tool runs.
    ///
    /// Covers the shapes the schemas in this crate actually use: required
    /// fields, property names, primitive types and one level of array items.
    /// Anything deeper is left to the tool's own argument parsing.
    pub fn validate_args(&self, args: &serde_json::Value) -> Result<(), ToolError> {
        let Some(given) = args.as_object() else {
            return Err(ToolError::InvalidArguments(
                "arguments must be a JSON object".to_string(),
            ));
        };

        let empty = serde_json::Map::new();
        let properties = self
            .parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .unwrap_or(&empty);

        if let Some(required) = self.parameters.get("required").and_then(|r| r.as_array()) {
            for name in required.iter().filter_map(|v| v.as_str()) {
                if given.get(name).map_or(true, |v| v.is_null()) {
                    return Err(ToolError::InvalidArguments(format!(
                        "missing required argument '{name}'"
                    )));
                }
            }
        }

        for (name, value) in given {
            let Some(spec) = properties.get(name) else {
                return Err(ToolError::InvalidArguments(format!(
                    "unexpected argument '{name}'"
                )));
            };
            // Null on an optional field reads as absent.
            if value.is_null() {
                continue;
            }
            let Some(expected) = spec.get("type").and_then(|t| t.as_str()) else {
                continue;
            };
            check_type(name, expected, value)?;
            if expected == "array" {
                let item_type = spec
                    .get("items")
                    .and_then(|i| i.get("type"))
                    .and_then(|t| t.as_str());
                if let (Some(item_type), Some(items)) = (item_type, value.as_array()) {
                    for item in items {
                        check_type(&format!("{name} items"), item_type, item)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_type(name: &str, expected: &str, value: &serde_json::Value) -> Result<(), ToolError> {
    let matches = match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    };
    if matches {
        Ok(())
    } else {
        Err(ToolError::InvalidArguments(format!(
            "argument '{name}' must be of type {expected}"
        )))
    }
}

/// Errors from tool dispatch and execution.
///
/// Everything except `Unrecoverable` goes back to the model as a failing
/// observation so it can correct itself. `Unrecoverable` ends the turn.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    NotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    #[error("unrecoverable failure: {0}")]
    Unrecoverable(String),
}

/// A capability the model can invoke during a turn.
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// Name, description and parameter schema.
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool. Arguments have already passed schema validation.
    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError>;
}

/// Outcome of one tool call, rendered for the transcript.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    /// Text the model sees as the observation.
    pub content: String,
}

impl ToolResult {
    pub fn ok(tool_name: impl Into<String>, value: &serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            content: serde_json::to_string_pretty(value).unwrap_or_default(),
        }
    }

    pub fn fail(tool_name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            content: format!("Error: {message}"),
        }
    }
}

/// The set of tools offered to the model for a turn.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: impl AgentTool + 'static) {
        let def = tool.definition();
        self.tools.insert(def.name.clone(), Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentTool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of every registered tool.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Looks up a tool, validates the arguments against its schema, runs it.
    pub async fn dispatch(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.definition().validate_args(&args)?;
        tool.execute(args, ctx).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
