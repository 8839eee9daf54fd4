//! Tools for reading and refreshing stored listening profiles.

use async_trait::async_trait;
use serde::Deserialize;

use super::registry::{AgentTool, ToolDefinition, ToolError};
use super::{parse_args, to_json, ToolContext};

pub struct RefreshListeningProfileTool;

#[derive(Deserialize)]
struct RefreshListeningProfileArgs {
    username: String,
}

#[async_trait]
impl AgentTool for RefreshListeningProfileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "refresh_listening_profile",
            "Rebuild the user's listening profile from their current catalog history and store \
             it as a new snapshot. Slow: several catalog calls. Use when no stored profile \
             exists or the user asks for fresh data.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string"}
                },
                "required": ["username"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: RefreshListeningProfileArgs = parse_args(args)?;
        let profile = ctx.aggregator.aggregate(&args.username).await?;
        ctx.profiles.save(&profile)?;
        Ok(serde_json::json!({
            "saved": true,
            "snapshot_date": profile.snapshot_date,
            "summary": profile.summary(),
        }))
    }
}

pub struct ReadListeningProfileTool;

#[derive(Deserialize)]
struct ReadListeningProfileArgs {
    username: String,
}

#[async_trait]
impl AgentTool for ReadListeningProfileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "read_listening_profile",
            "Read the most recent stored listening profile for a user: top tracks, artists and \
             genres. Cheap; prefer this over refreshing.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string"}
                },
                "required": ["username"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: ReadListeningProfileArgs = parse_args(args)?;
        match ctx.profiles.load_latest(&args.username)? {
            Some(profile) => to_json(&profile),
            None => Ok(serde_json::json!({
                "profile": null,
                "message": format!(
                    "No stored listening profile for '{}'. Call refresh_listening_profile \
                     to build one.",
                    args.username
                ),
            })),
        }
    }
}
