//! Tools exposing catalog lookups to the model.

use async_trait::async_trait;
use serde::Deserialize;

use super::registry::{AgentTool, ToolDefinition, ToolError};
use super::{parse_args, to_json, ToolContext};

const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_PLAYLIST_LIMIT: usize = 20;
const MAX_PAGE: usize = 50;

pub struct SearchTracksTool;

#[derive(Deserialize)]
struct SearchTracksArgs {
    query: String,
    limit: Option<usize>,
}

#[async_trait]
impl AgentTool for SearchTracksTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "search_tracks",
            "Search the music catalog for tracks by free text (title, artist, lyrics fragment). \
             Returns matching tracks with their ids.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Free text to search for"},
                    "limit": {"type": "integer", "description": "Max results, up to 50 (default 10)"}
                },
                "required": ["query"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: SearchTracksArgs = parse_args(args)?;
        let limit = args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_PAGE);
        let tracks = ctx.catalog.search_tracks(&args.query, limit).await?;
        Ok(serde_json::json!({
            "count": tracks.len(),
            "tracks": to_json(&tracks)?,
        }))
    }
}

pub struct GetArtistTool;

#[derive(Deserialize)]
struct GetArtistArgs {
    artist_id: String,
}

#[async_trait]
impl AgentTool for GetArtistTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_artist",
            "Fetch one artist by catalog id, including their genres.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "artist_id": {"type": "string"}
                },
                "required": ["artist_id"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: GetArtistArgs = parse_args(args)?;
        let artist = ctx.catalog.get_artist(&args.artist_id).await?;
        to_json(&artist)
    }
}

pub struct GetSeveralArtistsTool;

#[derive(Deserialize)]
struct GetSeveralArtistsArgs {
    artist_ids: Vec<String>,
}

#[async_trait]
impl AgentTool for GetSeveralArtistsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_several_artists",
            "Fetch up to 50 artists in one call by their catalog ids.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "artist_ids": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["artist_ids"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: GetSeveralArtistsArgs = parse_args(args)?;
        let artists = ctx.catalog.get_several_artists(&args.artist_ids).await?;
        Ok(serde_json::json!({
            "count": artists.len(),
            "artists": to_json(&artists)?,
        }))
    }
}

pub struct GetAlbumTool;

#[derive(Deserialize)]
struct GetAlbumArgs {
    album_id: String,
}

#[async_trait]
impl AgentTool for GetAlbumTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_album",
            "Fetch one album by catalog id, including its track listing.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "album_id": {"type": "string"}
                },
                "required": ["album_id"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: GetAlbumArgs = parse_args(args)?;
        let album = ctx.catalog.get_album(&args.album_id).await?;
        to_json(&album)
    }
}

pub struct ListPlaylistsTool;

#[derive(Deserialize)]
struct ListPlaylistsArgs {
    limit: Option<usize>,
}

#[async_trait]
impl AgentTool for ListPlaylistsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "list_playlists",
            "List the user's playlists with their ids and track counts.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Max results, up to 50 (default 20)"}
                },
                "required": []
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: ListPlaylistsArgs = parse_args(args)?;
        let limit = args.limit.unwrap_or(DEFAULT_PLAYLIST_LIMIT).clamp(1, MAX_PAGE);
        let playlists = ctx.catalog.list_playlists(limit).await?;
        Ok(serde_json::json!({
            "count": playlists.len(),
            "playlists": to_json(&playlists)?,
        }))
    }
}

pub struct GetPlaylistTracksTool;

#[derive(Deserialize)]
struct GetPlaylistTracksArgs {
    playlist_id: String,
}

#[async_trait]
impl AgentTool for GetPlaylistTracksTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_playlist_tracks",
            "Fetch one playlist by id together with the tracks it contains.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "playlist_id": {"type": "string"}
                },
                "required": ["playlist_id"]
            }),
        )
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        let args: GetPlaylistTracksArgs = parse_args(args)?;
        let detail = ctx.catalog.get_playlist_with_tracks(&args.playlist_id).await?;
        to_json(&detail)
    }
}
