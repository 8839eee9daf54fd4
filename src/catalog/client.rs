//! Typed façade over the remote music service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::models::{
    Album, Artist, Playlist, PlaylistWithTracks, RecommendationSeed, TimeWindow, Track,
};
use crate::config::CatalogSettings;

/// How over-limit batches are handled at the client edge.
///
/// The service caps batch artist lookups (50 ids) and recommendation seeds
/// (5 per kind). `Truncate` silently drops the remainder, which is the
/// historical behavior; `Reject` fails the call with an invalid-argument
/// error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    Truncate,
    Reject,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        LimitPolicy::Truncate
    }
}

impl LimitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitPolicy::Truncate => "truncate",
            LimitPolicy::Reject => "reject",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "truncate" => Some(LimitPolicy::Truncate),
            "reject" => Some(LimitPolicy::Reject),
            _ => None,
        }
    }
}

/// Service batch limits together with the policy applied when exceeded.
#[derive(Debug, Clone, Copy)]
pub struct BatchLimits {
    /// Maximum ids per batch artist lookup.
    pub artist_batch: usize,
    /// Maximum items per recommendation seed kind.
    pub seed_per_kind: usize,
    pub policy: LimitPolicy,
}

impl BatchLimits {
    pub fn new(settings: &CatalogSettings) -> Self {
        Self {
            artist_batch: settings.artist_batch_limit,
            seed_per_kind: settings.seed_limit,
            policy: settings.limit_policy,
        }
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            artist_batch: 50,
            seed_per_kind: 5,
            policy: LimitPolicy::Truncate,
        }
    }
}

/// One method per remote catalog operation.
///
/// Implementations validate identifiers before any network traffic, normalize
/// transport failures into [`CatalogError`], and are safe for concurrent use
/// across conversations. Only `create_playlist` and `add_tracks` mutate remote
/// state; every other operation is a read and may be retried by the
/// implementation.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Resolves the id of the authenticated user.
    async fn current_user(&self) -> Result<String, CatalogError>;

    /// Full-text track search, best matches first.
    /// Returns an empty list when nothing matches.
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError>;

    /// Fetches one artist by id.
    /// Returns `CatalogError::NotFound` if the id does not resolve.
    async fn get_artist(&self, artist_id: &str) -> Result<Artist, CatalogError>;

    /// Fetches several artists in one call.
    ///
    /// Accepts at most the service batch limit; more ids are truncated or
    /// rejected according to the configured [`LimitPolicy`].
    async fn get_several_artists(&self, artist_ids: &[String])
        -> Result<Vec<Artist>, CatalogError>;

    /// Fetches one album with its tracks.
    /// Returns `CatalogError::NotFound` if the id does not resolve.
    async fn get_album(&self, album_id: &str) -> Result<Album, CatalogError>;

    /// The authenticated user's top tracks for one historical window,
    /// best ranked first.
    async fn get_top_tracks(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError>;

    /// Tracks recommended from the given seed.
    ///
    /// Seed lists beyond the per-kind service limit follow the configured
    /// [`LimitPolicy`].
    async fn get_recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError>;

    /// Creates an empty private playlist owned by `user_id`.
    /// Mutates remote state; never retried automatically.
    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogError>;

    /// Appends tracks to a playlist in the given order, as one batch.
    /// Mutates remote state; never retried automatically.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String])
        -> Result<(), CatalogError>;

    /// The authenticated user's playlists.
    async fn list_playlists(&self, limit: usize) -> Result<Vec<Playlist>, CatalogError>;

    /// Fetches one playlist together with its tracks.
    /// Returns `CatalogError::NotFound` if the id does not resolve.
    async fn get_playlist_with_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<PlaylistWithTracks, CatalogError>;
}
