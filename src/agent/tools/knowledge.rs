//! Tools backed by external music knowledge sources.

use async_trait::async_trait;
use serde::Deserialize;

use super::registry::{AgentTool, ToolDefinition, ToolError};
use super::{parse_args, ToolContext};

const DEFAULT_SIMILAR_LIMIT: usize = 10;

pub struct SimilarArtistsTool;

#[derive(Deserialize)]
struct SimilarArtistsArgs {
    artist_name: String,
    limit: Option<usize>,
}

#[async_trait]
impl AgentTool for SimilarArtistsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "similar_artists",
            "Find artists similar to a named one, using community listening data. \
             Takes a name, not a catalog id.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "artist_name": {"type": "string"},
                    "limit": {"type": "integer", "description": "Max results (default 10)"}
                },
                "required": ["artist_name"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: SimilarArtistsArgs = parse_args(args)?;
        let Some(knowledge) = &ctx.knowledge else {
            return Err(ToolError::ExecutionFailed(
                "no music knowledge source is configured".to_string(),
            ));
        };
        let limit = args.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT).clamp(1, 50);
        let similar = knowledge
            .similar_artists(&args.artist_name, limit)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(serde_json::json!({
            "count": similar.len(),
            "similar_artists": similar,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fails_cleanly_when_not_configured() {
        let ctx = ToolContext::fixture();
        let result = SimilarArtistsTool
            .execute(serde_json::json!({"artist_name": "Slowdive"}), &ctx)
            .await;
        match result {
            Err(ToolError::ExecutionFailed(msg)) => assert!(msg.contains("configured")),
            other => panic!("expected execution failure, got {other:?}"),
        }
    }
}
