//! The model-facing toolset.
//!
//! Each tool wraps one operation of the underlying components and renders
//! its outcome as JSON for the transcript. Component errors map onto
//! [`ToolError`] here: argument problems go back to the model for
//! self-correction, store I/O failures end the turn.

mod catalog;
mod context;
mod knowledge;
mod playlist;
mod profile;
mod registry;

pub use catalog::{
    GetAlbumTool, GetArtistTool, GetPlaylistTracksTool, GetSeveralArtistsTool, ListPlaylistsTool,
    SearchTracksTool,
};
pub use context::ToolContext;
pub use knowledge::SimilarArtistsTool;
pub use playlist::{BuildRecommendationPlaylistTool, CreatePlaylistTool};
pub use profile::{ReadListeningProfileTool, RefreshListeningProfileTool};
pub use registry::{AgentTool, ToolDefinition, ToolError, ToolRegistry, ToolResult};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::playlist::PlaylistError;
use crate::profile::ProfileStoreError;

impl From<CatalogError> for ToolError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::InvalidArgument(msg) => ToolError::InvalidArguments(msg),
            other => ToolError::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<PlaylistError> for ToolError {
    fn from(e: PlaylistError) -> Self {
        match e {
            PlaylistError::InvalidArgument(msg) => ToolError::InvalidArguments(msg),
            PlaylistError::Catalog(inner) => inner.into(),
            other => ToolError::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<ProfileStoreError> for ToolError {
    fn from(e: ProfileStoreError) -> Self {
        match e {
            ProfileStoreError::InvalidUsername(msg) => ToolError::InvalidArguments(msg),
            // Disk trouble won't improve by telling the model about it.
            other => ToolError::Unrecoverable(other.to_string()),
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

/// Registry with the full toolset.
///
/// The similar-artists tool is only offered when a knowledge source is
/// configured, so the model never sees a tool that cannot succeed.
pub fn default_registry(include_knowledge: bool) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(SearchTracksTool);
    registry.register(GetArtistTool);
    registry.register(GetSeveralArtistsTool);
    registry.register(GetAlbumTool);
    registry.register(ListPlaylistsTool);
    registry.register(GetPlaylistTracksTool);
    registry.register(CreatePlaylistTool);
    registry.register(BuildRecommendationPlaylistTool);
    registry.register(RefreshListeningProfileTool);
    registry.register(ReadListeningProfileTool);
    if include_knowledge {
        registry.register(SimilarArtistsTool);
    }
    registry
}
