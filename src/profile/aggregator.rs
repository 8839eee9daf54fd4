//! Builds listening profile snapshots from catalog history windows.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::models::{TopArtists, TopGenres, TopTracks, UserProfile};
use crate::catalog::{CatalogClient, CatalogError, TimeWindow};
use crate::config::AggregationSettings;

/// Aggregates top-track windows into a single [`UserProfile`].
///
/// The output is deterministic for a given sequence of catalog responses:
/// windows are queried in their configured order and every collection keeps
/// first-seen ordering (genres sort alphabetically). Any window failure
/// aborts the whole aggregation so a snapshot never reflects partial history.
pub struct ProfileAggregator {
    catalog: Arc<dyn CatalogClient>,
    windows: Vec<TimeWindow>,
    page_size: usize,
    artist_batch_limit: usize,
}

impl ProfileAggregator {
    pub fn new(catalog: Arc<dyn CatalogClient>, settings: &AggregationSettings) -> Self {
        Self {
            catalog,
            windows: settings.windows.clone(),
            page_size: settings.page_size,
            artist_batch_limit: settings.artist_batch_limit,
        }
    }

    /// Aggregates a snapshot dated today.
    pub async fn aggregate(&self, username: &str) -> Result<UserProfile, CatalogError> {
        self.aggregate_at(username, Utc::now().date_naive()).await
    }

    /// Aggregates a snapshot with an explicit date. Two calls with the same
    /// date and unchanged history produce identical profiles.
    pub async fn aggregate_at(
        &self,
        username: &str,
        snapshot_date: NaiveDate,
    ) -> Result<UserProfile, CatalogError> {
        let mut tracks = Vec::new();
        let mut seen_tracks = HashSet::new();
        let mut artist_ids = Vec::new();
        let mut seen_artists = HashSet::new();

        for window in &self.windows {
            let page = self.catalog.get_top_tracks(*window, self.page_size).await?;
            debug!(window = window.as_str(), tracks = page.len(), "fetched top tracks");
            for track in page {
                if !seen_tracks.insert(track.id.clone()) {
                    continue;
                }
                if seen_artists.insert(track.primary_artist_id.clone()) {
                    artist_ids.push(track.primary_artist_id.clone());
                }
                tracks.push(track);
            }
        }

        if artist_ids.len() > self.artist_batch_limit {
            debug!(
                distinct = artist_ids.len(),
                kept = self.artist_batch_limit,
                "more distinct artists than one lookup allows, keeping the first"
            );
            artist_ids.truncate(self.artist_batch_limit);
        }
        let artists = self.catalog.get_several_artists(&artist_ids).await?;

        let genres: BTreeSet<String> =
            artists.iter().flat_map(|a| a.genres.iter().cloned()).collect();

        let profile = UserProfile {
            username: username.to_string(),
            snapshot_date,
            top_tracks: TopTracks::new(tracks),
            top_artists: TopArtists::new(artists),
            top_genres: TopGenres::new(genres),
        };
        info!(
            username,
            tracks = profile.top_tracks.count,
            artists = profile.top_artists.count,
            genres = profile.top_genres.count,
            "aggregated listening profile"
        );
        Ok(profile)
    }
}
