//! Listening profile snapshot types.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{Artist, Track};

const SUMMARY_ITEMS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTracks {
    pub count: usize,
    pub tracks: Vec<Track>,
}

impl TopTracks {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            count: tracks.len(),
            tracks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtists {
    pub count: usize,
    pub artists: Vec<Artist>,
}

impl TopArtists {
    pub fn new(artists: Vec<Artist>) -> Self {
        Self {
            count: artists.len(),
            artists,
        }
    }
}

/// Genres are kept sorted and unique so snapshots serialize deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGenres {
    pub count: usize,
    pub genres: BTreeSet<String>,
}

impl TopGenres {
    pub fn new(genres: BTreeSet<String>) -> Self {
        Self {
            count: genres.len(),
            genres,
        }
    }
}

/// One aggregated snapshot of a user's listening history.
///
/// Snapshots are immutable once written; the store appends new versions
/// rather than updating old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub snapshot_date: NaiveDate,
    pub top_tracks: TopTracks,
    pub top_artists: TopArtists,
    pub top_genres: TopGenres,
}

impl UserProfile {
    /// Compact human-readable digest, suitable as a tool observation.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Listening profile for {} (captured {}):",
            self.username, self.snapshot_date
        )];
        lines.push(format!(
            "Top tracks ({}): {}",
            self.top_tracks.count,
            listed(
                self.top_tracks
                    .tracks
                    .iter()
                    .map(|t| format!("\"{}\" by {}", t.title, t.primary_artist_name)),
                self.top_tracks.count,
            )
        ));
        lines.push(format!(
            "Top artists ({}): {}",
            self.top_artists.count,
            listed(
                self.top_artists.artists.iter().map(|a| a.name.clone()),
                self.top_artists.count,
            )
        ));
        lines.push(format!(
            "Top genres ({}): {}",
            self.top_genres.count,
            listed(self.top_genres.genres.iter().cloned(), self.top_genres.count)
        ));
        lines.join("\n")
    }
}

fn listed(items: impl Iterator<Item = String>, total: usize) -> String {
    if total == 0 {
        return "none".to_string();
    }
    let mut shown: Vec<String> = items.take(SUMMARY_ITEMS).collect();
    if total > shown.len() {
        shown.push(format!("and {} more", total - shown.len()));
    }
    shown.join(", ")
}
