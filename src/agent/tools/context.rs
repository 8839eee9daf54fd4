//! Shared components handed to tools at execution time.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::knowledge::LastFmClient;
use crate::playlist::PlaylistBuilder;
use crate::profile::{ProfileAggregator, ProfileStore};

/// Everything a tool may need, injected once at startup.
///
/// Tools hold no state of their own; they borrow the context per call, so a
/// single registry serves concurrent conversations.
#[derive(Clone)]
pub struct ToolContext {
    pub catalog: Arc<dyn CatalogClient>,
    pub aggregator: Arc<ProfileAggregator>,
    pub profiles: Arc<dyn ProfileStore>,
    pub playlists: Arc<PlaylistBuilder>,
    /// Absent when no Last.fm API key is configured.
    pub knowledge: Option<Arc<LastFmClient>>,
}

impl ToolContext {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        aggregator: Arc<ProfileAggregator>,
        profiles: Arc<dyn ProfileStore>,
        playlists: Arc<PlaylistBuilder>,
        knowledge: Option<Arc<LastFmClient>>,
    ) -> Self {
        Self {
            catalog,
            aggregator,
            profiles,
            playlists,
            knowledge,
        }
    }
}
