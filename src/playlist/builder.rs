//! Playlist creation flows on top of the catalog client.

use std::sync::Arc;

use tracing::{error, info};

use crate::catalog::{CatalogClient, CatalogError, Playlist, RecommendationSeed};

/// Most tracks one recommendation request may return.
const MAX_RECOMMENDATION_TRACKS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("invalid playlist request: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The playlist exists remotely but its tracks were not appended. The id
    /// is surfaced so the caller can retry the append or clean up by hand.
    #[error("playlist {playlist_id} was created but adding tracks failed: {source}")]
    PartiallyCreated {
        playlist_id: String,
        #[source]
        source: CatalogError,
    },
}

/// Creates private playlists for the authenticated user.
///
/// Creation is not atomic: the playlist is created first, then its tracks are
/// appended in one batch. When the append fails the error names the playlist
/// that was left behind.
pub struct PlaylistBuilder {
    catalog: Arc<dyn CatalogClient>,
}

impl PlaylistBuilder {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Creates a private playlist holding `track_ids` in order.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        track_ids: &[String],
    ) -> Result<Playlist, PlaylistError> {
        if track_ids.is_empty() {
            return Err(PlaylistError::InvalidArgument(
                "a playlist needs at least one track".to_string(),
            ));
        }

        let user_id = self.catalog.current_user().await?;
        let playlist = self.catalog.create_playlist(&user_id, name, description).await?;
        info!(playlist_id = %playlist.id, name, "created empty playlist");

        if let Err(e) = self.catalog.add_tracks(&playlist.id, track_ids).await {
            error!(
                playlist_id = %playlist.id,
                "playlist left empty, adding tracks failed: {e}"
            );
            return Err(PlaylistError::PartiallyCreated {
                playlist_id: playlist.id,
                source: e,
            });
        }

        info!(playlist_id = %playlist.id, tracks = track_ids.len(), "playlist populated");
        Ok(Playlist {
            id: playlist.id,
            name: playlist.name,
            track_count: track_ids.len(),
        })
    }

    /// Builds a playlist from recommendations for `seed`.
    ///
    /// An empty recommendation result is reported as not-found rather than
    /// creating an empty playlist.
    pub async fn recommend_and_build(
        &self,
        seed: &RecommendationSeed,
        name: &str,
        description: &str,
    ) -> Result<Playlist, PlaylistError> {
        let tracks = self
            .catalog
            .get_recommendations(seed, MAX_RECOMMENDATION_TRACKS)
            .await?;
        if tracks.is_empty() {
            return Err(CatalogError::not_found("recommendations", seed.describe()).into());
        }
        let track_ids: Vec<String> = tracks.into_iter().map(|t| t.id).collect();
        self.create(name, description, &track_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RemoteErrorKind, RemoteServiceError};

    #[test]
    fn test_partial_creation_error_names_the_playlist() {
        let err = PlaylistError::PartiallyCreated {
            playlist_id: "pl-42".to_string(),
            source: CatalogError::Remote(RemoteServiceError::new(
                "add_tracks",
                RemoteErrorKind::Api { status: 500 },
                "server error",
            )),
        };
        let message = err.to_string();
        assert!(message.contains("pl-42"));
        assert!(message.contains("adding tracks failed"));
    }
}
