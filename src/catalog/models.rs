//! Domain models for the remote music catalog.

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// A ranked historical period for top-track queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeWindow {
    /// All windows, shortest first. This is the order aggregation iterates in.
    pub fn all() -> Vec<TimeWindow> {
        vec![
            TimeWindow::ShortTerm,
            TimeWindow::MediumTerm,
            TimeWindow::LongTerm,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::ShortTerm => "short_term",
            TimeWindow::MediumTerm => "medium_term",
            TimeWindow::LongTerm => "long_term",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "short_term" => Some(TimeWindow::ShortTerm),
            "medium_term" => Some(TimeWindow::MediumTerm),
            "long_term" => Some(TimeWindow::LongTerm),
            _ => None,
        }
    }
}

/// A single track as returned by the catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Id of the first credited artist, used for artist aggregation.
    pub primary_artist_id: String,
    pub primary_artist_name: String,
}

/// An artist with its genre tags. `genres` is empty when the catalog
/// returned none for this artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// An album with its tracks in disc order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist_name: String,
    pub tracks: Vec<Track>,
}

/// Playlist metadata as known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub track_count: usize,
}

/// A playlist together with its tracks in playlist order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithTracks {
    pub playlist: Playlist,
    pub tracks: Vec<Track>,
}

/// Seeds biasing a recommendation query.
///
/// At least one of the three lists must be non-empty; construct through
/// [`RecommendationSeed::new`] to enforce this. The per-kind item cap is a
/// service limit applied by the client according to its configured
/// [`LimitPolicy`](super::LimitPolicy), not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSeed {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artist_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub track_ids: Vec<String>,
}

impl RecommendationSeed {
    /// Build a seed, rejecting the all-empty case.
    pub fn new(
        artist_ids: Vec<String>,
        genres: Vec<String>,
        track_ids: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let seed = Self {
            artist_ids,
            genres,
            track_ids,
        };
        if seed.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "at least one of artist_ids, genres or track_ids must be non-empty".to_string(),
            ));
        }
        Ok(seed)
    }

    pub fn is_empty(&self) -> bool {
        self.artist_ids.is_empty() && self.genres.is_empty() && self.track_ids.is_empty()
    }

    /// Short human-readable form for logs and error messages.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.artist_ids.is_empty() {
            parts.push(format!("artists={}", self.artist_ids.join(",")));
        }
        if !self.genres.is_empty() {
            parts.push(format!("genres={}", self.genres.join(",")));
        }
        if !self.track_ids.is_empty() {
            parts.push(format!("tracks={}", self.track_ids.join(",")));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_roundtrip() {
        for window in TimeWindow::all() {
            assert_eq!(TimeWindow::from_str(window.as_str()), Some(window));
        }
        assert_eq!(TimeWindow::from_str("last_week"), None);
    }

    #[test]
    fn test_time_window_order() {
        assert_eq!(
            TimeWindow::all(),
            vec![
                TimeWindow::ShortTerm,
                TimeWindow::MediumTerm,
                TimeWindow::LongTerm
            ]
        );
    }

    #[test]
    fn test_seed_requires_at_least_one_list() {
        let result = RecommendationSeed::new(vec![], vec![], vec![]);
        assert!(matches!(result, Err(CatalogError::InvalidArgument(_))));
    }

    #[test]
    fn test_seed_accepts_single_genre() {
        let seed =
            RecommendationSeed::new(vec![], vec!["rock".to_string()], vec![]).unwrap();
        assert_eq!(seed.genres, vec!["rock".to_string()]);
        assert!(seed.artist_ids.is_empty());
        assert!(seed.track_ids.is_empty());
    }

    #[test]
    fn test_seed_describe() {
        let seed = RecommendationSeed::new(
            vec!["a1".to_string()],
            vec!["jazz".to_string()],
            vec![],
        )
        .unwrap();
        assert_eq!(seed.describe(), "artists=a1 genres=jazz");
    }

    #[test]
    fn test_artist_genres_default_when_missing() {
        let artist: Artist =
            serde_json::from_str(r#"{"id": "a1", "name": "Nina Simone"}"#).unwrap();
        assert!(artist.genres.is_empty());
    }
}
