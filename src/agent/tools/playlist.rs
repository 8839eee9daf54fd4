//! Tools that create playlists on the user's behalf.

use async_trait::async_trait;
use serde::Deserialize;

use super::registry::{AgentTool, ToolDefinition, ToolError};
use super::{parse_args, to_json, ToolContext};
use crate::catalog::RecommendationSeed;

pub struct CreatePlaylistTool;

#[derive(Deserialize)]
struct CreatePlaylistArgs {
    name: String,
    #[serde(default)]
    description: String,
    track_ids: Vec<String>,
}

#[async_trait]
impl AgentTool for CreatePlaylistTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_playlist",
            "Create a private playlist holding the given tracks, in order. \
             Requires at least one track id.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "track_ids": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["name", "track_ids"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: CreatePlaylistArgs = parse_args(args)?;
        let playlist = ctx
            .playlists
            .create(&args.name, &args.description, &args.track_ids)
            .await?;
        Ok(serde_json::json!({
            "created": to_json(&playlist)?,
        }))
    }
}

pub struct BuildRecommendationPlaylistTool;

#[derive(Deserialize)]
struct BuildRecommendationPlaylistArgs {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    seed_artist_ids: Vec<String>,
    #[serde(default)]
    seed_genres: Vec<String>,
    #[serde(default)]
    seed_track_ids: Vec<String>,
}

#[async_trait]
impl AgentTool for BuildRecommendationPlaylistTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "build_recommendation_playlist",
            "Create a private playlist from catalog recommendations. Seed it with artist ids, \
             genre names and/or track ids; at least one seed of any kind is required and at \
             most five per kind are used.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "seed_artist_ids": {"type": "array", "items": {"type": "string"}},
                    "seed_genres": {"type": "array", "items": {"type": "string"}},
                    "seed_track_ids": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["name"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: BuildRecommendationPlaylistArgs = parse_args(args)?;
        let seed =
            RecommendationSeed::new(args.seed_artist_ids, args.seed_genres, args.seed_track_ids)?;
        let playlist = ctx
            .playlists
            .recommend_and_build(&seed, &args.name, &args.description)
            .await?;
        Ok(serde_json::json!({
            "created": to_json(&playlist)?,
            "seed": seed.describe(),
        }))
    }
}
