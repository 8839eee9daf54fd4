//! Configurable in-memory catalog for integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use maestro::catalog::{
    Album, Artist, CatalogClient, CatalogError, Playlist, PlaylistWithTracks, RecommendationSeed,
    RemoteErrorKind, RemoteServiceError, TimeWindow, Track,
};

use super::constants::STUB_USER_ID;

/// One recorded call against the stub, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    CurrentUser,
    SearchTracks { query: String, limit: usize },
    GetArtist { id: String },
    GetSeveralArtists { count: usize },
    GetAlbum { id: String },
    GetTopTracks { window: TimeWindow, limit: usize },
    GetRecommendations { limit: usize },
    CreatePlaylist { name: String },
    AddTracks { playlist_id: String, count: usize },
    ListPlaylists,
    GetPlaylistWithTracks { id: String },
}

/// In-memory [`CatalogClient`] with canned data and failure injection.
///
/// Every call is recorded so tests can assert on exactly what was requested,
/// batch sizes included. Configure with the `with_*` builders before wrapping
/// in an `Arc`.
pub struct StubCatalog {
    user_id: String,
    top_tracks: HashMap<TimeWindow, Vec<Track>>,
    artists: HashMap<String, Artist>,
    albums: HashMap<String, Album>,
    recommendations: Vec<Track>,
    search_results: Vec<Track>,
    /// Tracks seen during configuration, used to resolve playlist contents.
    known_tracks: HashMap<String, Track>,
    fail_windows: HashSet<TimeWindow>,
    fail_add_tracks: bool,
    calls: Mutex<Vec<CatalogCall>>,
    playlists: Mutex<Vec<Playlist>>,
    playlist_tracks: Mutex<HashMap<String, Vec<String>>>,
    playlist_counter: AtomicUsize,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self {
            user_id: STUB_USER_ID.to_string(),
            top_tracks: HashMap::new(),
            artists: HashMap::new(),
            albums: HashMap::new(),
            recommendations: Vec::new(),
            search_results: Vec::new(),
            known_tracks: HashMap::new(),
            fail_windows: HashSet::new(),
            fail_add_tracks: false,
            calls: Mutex::new(Vec::new()),
            playlists: Mutex::new(Vec::new()),
            playlist_tracks: Mutex::new(HashMap::new()),
            playlist_counter: AtomicUsize::new(0),
        }
    }

    pub fn with_top_tracks(mut self, window: TimeWindow, tracks: Vec<Track>) -> Self {
        self.remember(&tracks);
        self.top_tracks.insert(window, tracks);
        self
    }

    pub fn with_artists(mut self, artists: Vec<Artist>) -> Self {
        for artist in artists {
            self.artists.insert(artist.id.clone(), artist);
        }
        self
    }

    pub fn with_album(mut self, album: Album) -> Self {
        self.remember(&album.tracks);
        self.albums.insert(album.id.clone(), album);
        self
    }

    pub fn with_recommendations(mut self, tracks: Vec<Track>) -> Self {
        self.remember(&tracks);
        self.recommendations = tracks;
        self
    }

    pub fn with_search_results(mut self, tracks: Vec<Track>) -> Self {
        self.remember(&tracks);
        self.search_results = tracks;
        self
    }

    /// Make one top-tracks window answer with a server error.
    pub fn fail_window(mut self, window: TimeWindow) -> Self {
        self.fail_windows.insert(window);
        self
    }

    /// Make every `add_tracks` call answer with a server error.
    pub fn fail_add_tracks(mut self) -> Self {
        self.fail_add_tracks = true;
        self
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Playlists created through the stub so far.
    pub fn created_playlists(&self) -> Vec<Playlist> {
        self.playlists.lock().unwrap().clone()
    }

    /// Track ids appended to a playlist, in append order.
    pub fn tracks_in(&self, playlist_id: &str) -> Vec<String> {
        self.playlist_tracks
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default()
    }

    fn remember(&mut self, tracks: &[Track]) {
        for track in tracks {
            self.known_tracks.insert(track.id.clone(), track.clone());
        }
    }

    fn record(&self, call: CatalogCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable(operation: &'static str) -> CatalogError {
        CatalogError::Remote(RemoteServiceError::new(
            operation,
            RemoteErrorKind::Api { status: 503 },
            "injected failure",
        ))
    }
}

impl Default for StubCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn current_user(&self) -> Result<String, CatalogError> {
        self.record(CatalogCall::CurrentUser);
        Ok(self.user_id.clone())
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        self.record(CatalogCall::SearchTracks {
            query: query.to_string(),
            limit,
        });
        let mut results = self.search_results.clone();
        results.truncate(limit);
        Ok(results)
    }

    async fn get_artist(&self, artist_id: &str) -> Result<Artist, CatalogError> {
        self.record(CatalogCall::GetArtist {
            id: artist_id.to_string(),
        });
        self.artists
            .get(artist_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("artist", artist_id))
    }

    async fn get_several_artists(
        &self,
        artist_ids: &[String],
    ) -> Result<Vec<Artist>, CatalogError> {
        self.record(CatalogCall::GetSeveralArtists {
            count: artist_ids.len(),
        });
        Ok(artist_ids
            .iter()
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    async fn get_album(&self, album_id: &str) -> Result<Album, CatalogError> {
        self.record(CatalogCall::GetAlbum {
            id: album_id.to_string(),
        });
        self.albums
            .get(album_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("album", album_id))
    }

    async fn get_top_tracks(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        self.record(CatalogCall::GetTopTracks { window, limit });
        if self.fail_windows.contains(&window) {
            return Err(Self::unavailable("get_top_tracks"));
        }
        let mut tracks = self.top_tracks.get(&window).cloned().unwrap_or_default();
        tracks.truncate(limit);
        Ok(tracks)
    }

    async fn get_recommendations(
        &self,
        _seed: &RecommendationSeed,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        self.record(CatalogCall::GetRecommendations { limit });
        let mut tracks = self.recommendations.clone();
        tracks.truncate(limit);
        Ok(tracks)
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        _description: &str,
    ) -> Result<Playlist, CatalogError> {
        self.record(CatalogCall::CreatePlaylist {
            name: name.to_string(),
        });
        let n = self.playlist_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let playlist = Playlist {
            id: format!("pl-{}", n),
            name: name.to_string(),
            track_count: 0,
        };
        self.playlists.lock().unwrap().push(playlist.clone());
        Ok(playlist)
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), CatalogError> {
        self.record(CatalogCall::AddTracks {
            playlist_id: playlist_id.to_string(),
            count: track_ids.len(),
        });
        if self.fail_add_tracks {
            return Err(Self::unavailable("add_tracks"));
        }
        let mut playlists = self.playlists.lock().unwrap();
        match playlists.iter_mut().find(|p| p.id == playlist_id) {
            Some(playlist) => playlist.track_count += track_ids.len(),
            None => return Err(CatalogError::not_found("playlist", playlist_id)),
        }
        self.playlist_tracks
            .lock()
            .unwrap()
            .entry(playlist_id.to_string())
            .or_default()
            .extend(track_ids.iter().cloned());
        Ok(())
    }

    async fn list_playlists(&self, limit: usize) -> Result<Vec<Playlist>, CatalogError> {
        self.record(CatalogCall::ListPlaylists);
        let mut playlists = self.playlists.lock().unwrap().clone();
        playlists.truncate(limit);
        Ok(playlists)
    }

    async fn get_playlist_with_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<PlaylistWithTracks, CatalogError> {
        self.record(CatalogCall::GetPlaylistWithTracks {
            id: playlist_id.to_string(),
        });
        let playlist = self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("playlist", playlist_id))?;
        let tracks = self
            .playlist_tracks
            .lock()
            .unwrap()
            .get(playlist_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.known_tracks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(PlaylistWithTracks { playlist, tracks })
    }
}
