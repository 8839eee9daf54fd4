//! HTTP implementation of [`CatalogClient`] against the remote music service.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::{BatchLimits, CatalogClient, LimitPolicy};
use super::error::{CatalogError, RemoteErrorKind, RemoteServiceError};
use super::models::{
    Album, Artist, Playlist, PlaylistWithTracks, RecommendationSeed, TimeWindow, Track,
};
use super::retry::RetryPolicy;
use crate::config::CatalogSettings;

/// Catalog client speaking the service's REST API.
///
/// Reads go through the retry policy, writes never do. The bearer token sits
/// behind a lock so it can be swapped at runtime without rebuilding the
/// client.
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<String>,
    retry: RetryPolicy,
    limits: BatchLimits,
}

impl HttpCatalogClient {
    pub fn new(settings: &CatalogSettings, bearer_token: String) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                RemoteServiceError::new("client_init", RemoteErrorKind::Connection, e.to_string())
            })?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(bearer_token),
            retry: RetryPolicy::new(settings),
            limits: BatchLimits::new(settings),
        })
    }

    /// Replaces the bearer token used for subsequent requests.
    pub fn set_bearer_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = token.into();
        info!("catalog bearer token replaced");
    }

    fn bearer(&self) -> String {
        self.token.read().unwrap().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Enforces a service batch limit according to the configured policy.
    fn apply_limit<'a>(
        &self,
        operation: &'static str,
        what: &str,
        items: &'a [String],
        limit: usize,
    ) -> Result<&'a [String], CatalogError> {
        if items.len() <= limit {
            return Ok(items);
        }
        match self.limits.policy {
            LimitPolicy::Truncate => {
                debug!(operation, what, given = items.len(), limit, "truncating over-limit batch");
                Ok(&items[..limit])
            }
            LimitPolicy::Reject => Err(CatalogError::InvalidArgument(format!(
                "{what} accepts at most {limit} items, got {}",
                items.len()
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Raw fetchers, one per endpoint. Wrapped by the trait methods below.
    // ------------------------------------------------------------------

    async fn fetch_current_user(&self) -> Result<String, CatalogError> {
        let op = "current_user";
        let response = self
            .client
            .get(self.url("/me"))
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let user: UserDto = parse_json(op, check_status(op, response).await?).await?;
        Ok(user.id)
    }

    async fn fetch_search_tracks(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        let op = "search_tracks";
        let response = self
            .client
            .get(self.url("/search"))
            .query(&[("q", query), ("type", "track"), ("limit", &limit.to_string())])
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let body: SearchResponseDto = parse_json(op, check_status(op, response).await?).await?;
        tracks_from_dtos(op, body.tracks.items)
    }

    async fn fetch_artist(&self, artist_id: &str) -> Result<Artist, CatalogError> {
        let op = "get_artist";
        let response = self
            .client
            .get(self.url(&format!("/artists/{artist_id}")))
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        if response.status().as_u16() == 404 {
            return Err(CatalogError::not_found("artist", artist_id));
        }
        let dto: ArtistDto = parse_json(op, check_status(op, response).await?).await?;
        Ok(dto.into_artist())
    }

    async fn fetch_several_artists(&self, ids: &[String]) -> Result<Vec<Artist>, CatalogError> {
        let op = "get_several_artists";
        let response = self
            .client
            .get(self.url("/artists"))
            .query(&[("ids", ids.join(","))])
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let body: SeveralArtistsDto = parse_json(op, check_status(op, response).await?).await?;
        Ok(body.artists.into_iter().map(ArtistDto::into_artist).collect())
    }

    async fn fetch_album(&self, album_id: &str) -> Result<Album, CatalogError> {
        let op = "get_album";
        let response = self
            .client
            .get(self.url(&format!("/albums/{album_id}")))
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        if response.status().as_u16() == 404 {
            return Err(CatalogError::not_found("album", album_id));
        }
        let dto: AlbumDto = parse_json(op, check_status(op, response).await?).await?;
        let artist_name = dto
            .artists
            .first()
            .map(|a| a.name.clone())
            .ok_or_else(|| invalid_response(op, format!("album {} has no artists", dto.id)))?;
        Ok(Album {
            id: dto.id,
            title: dto.name,
            artist_name,
            tracks: tracks_from_dtos(op, dto.tracks.items)?,
        })
    }

    async fn fetch_top_tracks(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        let op = "get_top_tracks";
        let response = self
            .client
            .get(self.url("/me/top/tracks"))
            .query(&[("time_range", window.as_str()), ("limit", &limit.to_string())])
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let body: TrackPageDto = parse_json(op, check_status(op, response).await?).await?;
        tracks_from_dtos(op, body.items)
    }

    async fn fetch_recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        let op = "get_recommendations";
        let per_kind = self.limits.seed_per_kind;
        let artists = self.apply_limit(op, "seed_artists", &seed.artist_ids, per_kind)?;
        let genres = self.apply_limit(op, "seed_genres", &seed.genres, per_kind)?;
        let tracks = self.apply_limit(op, "seed_tracks", &seed.track_ids, per_kind)?;

        let mut params = vec![("limit", limit.to_string())];
        if !artists.is_empty() {
            params.push(("seed_artists", artists.join(",")));
        }
        if !genres.is_empty() {
            params.push(("seed_genres", genres.join(",")));
        }
        if !tracks.is_empty() {
            params.push(("seed_tracks", tracks.join(",")));
        }

        let response = self
            .client
            .get(self.url("/recommendations"))
            .query(&params)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let body: RecommendationsDto = parse_json(op, check_status(op, response).await?).await?;
        tracks_from_dtos(op, body.tracks)
    }

    async fn fetch_playlists(&self, limit: usize) -> Result<Vec<Playlist>, CatalogError> {
        let op = "list_playlists";
        let response = self
            .client
            .get(self.url("/me/playlists"))
            .query(&[("limit", limit.to_string())])
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let body: PlaylistPageDto = parse_json(op, check_status(op, response).await?).await?;
        Ok(body.items.into_iter().map(PlaylistDto::into_playlist).collect())
    }

    async fn fetch_playlist_with_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<PlaylistWithTracks, CatalogError> {
        let op = "get_playlist_with_tracks";
        let response = self
            .client
            .get(self.url(&format!("/playlists/{playlist_id}")))
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        if response.status().as_u16() == 404 {
            return Err(CatalogError::not_found("playlist", playlist_id));
        }
        let dto: PlaylistDetailDto = parse_json(op, check_status(op, response).await?).await?;
        // Deleted or region-locked entries come back as null tracks.
        let track_dtos: Vec<TrackDto> =
            dto.tracks.items.into_iter().filter_map(|item| item.track).collect();
        let tracks = tracks_from_dtos(op, track_dtos)?;
        Ok(PlaylistWithTracks {
            playlist: Playlist {
                id: dto.id,
                name: dto.name,
                track_count: tracks.len(),
            },
            tracks,
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn current_user(&self) -> Result<String, CatalogError> {
        self.retry.run("current_user", || self.fetch_current_user()).await
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        if query.trim().is_empty() {
            return Err(CatalogError::InvalidArgument(
                "search query must not be empty".to_string(),
            ));
        }
        self.retry
            .run("search_tracks", || self.fetch_search_tracks(query, limit))
            .await
    }

    async fn get_artist(&self, artist_id: &str) -> Result<Artist, CatalogError> {
        require_id("artist id", artist_id)?;
        self.retry.run("get_artist", || self.fetch_artist(artist_id)).await
    }

    async fn get_several_artists(
        &self,
        artist_ids: &[String],
    ) -> Result<Vec<Artist>, CatalogError> {
        require_ids("artist ids", artist_ids)?;
        if artist_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids =
            self.apply_limit("get_several_artists", "artist lookup", artist_ids, self.limits.artist_batch)?;
        self.retry
            .run("get_several_artists", || self.fetch_several_artists(ids))
            .await
    }

    async fn get_album(&self, album_id: &str) -> Result<Album, CatalogError> {
        require_id("album id", album_id)?;
        self.retry.run("get_album", || self.fetch_album(album_id)).await
    }

    async fn get_top_tracks(
        &self,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        self.retry
            .run("get_top_tracks", || self.fetch_top_tracks(window, limit))
            .await
    }

    async fn get_recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        if seed.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "recommendation seed must contain at least one artist, genre or track".to_string(),
            ));
        }
        self.retry
            .run("get_recommendations", || self.fetch_recommendations(seed, limit))
            .await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Playlist, CatalogError> {
        require_id("user id", user_id)?;
        if name.trim().is_empty() {
            return Err(CatalogError::InvalidArgument(
                "playlist name must not be empty".to_string(),
            ));
        }
        let op = "create_playlist";
        let body = CreatePlaylistBody {
            name,
            description,
            public: false,
        };
        // A write: no retry, a duplicate attempt would create a second playlist.
        let response = self
            .client
            .post(self.url(&format!("/users/{user_id}/playlists")))
            .bearer_auth(self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        let dto: PlaylistDto = parse_json(op, check_status(op, response).await?).await?;
        Ok(dto.into_playlist())
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), CatalogError> {
        require_id("playlist id", playlist_id)?;
        require_ids("track ids", track_ids)?;
        if track_ids.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "track ids must not be empty".to_string(),
            ));
        }
        let op = "add_tracks";
        let body = AddTracksBody {
            uris: track_ids.to_vec(),
        };
        // A write: no retry, a duplicate attempt would append tracks twice.
        let response = self
            .client
            .post(self.url(&format!("/playlists/{playlist_id}/tracks")))
            .bearer_auth(self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;
        check_status(op, response).await?;
        Ok(())
    }

    async fn list_playlists(&self, limit: usize) -> Result<Vec<Playlist>, CatalogError> {
        self.retry.run("list_playlists", || self.fetch_playlists(limit)).await
    }

    async fn get_playlist_with_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<PlaylistWithTracks, CatalogError> {
        require_id("playlist id", playlist_id)?;
        self.retry
            .run("get_playlist_with_tracks", || {
                self.fetch_playlist_with_tracks(playlist_id)
            })
            .await
    }
}

// ============================================================================
// Error mapping helpers
// ============================================================================

fn require_id(name: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidArgument(format!("{name} must not be empty")));
    }
    Ok(())
}

fn require_ids(name: &str, values: &[String]) -> Result<(), CatalogError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(CatalogError::InvalidArgument(format!(
            "{name} must not contain empty entries"
        )));
    }
    Ok(())
}

fn transport_error(operation: &'static str, e: reqwest::Error) -> CatalogError {
    let kind = if e.is_timeout() {
        RemoteErrorKind::Timeout
    } else {
        RemoteErrorKind::Connection
    };
    RemoteServiceError::new(operation, kind, e.to_string()).into()
}

fn invalid_response(operation: &'static str, message: impl Into<String>) -> CatalogError {
    RemoteServiceError::new(operation, RemoteErrorKind::InvalidResponse, message).into()
}

async fn check_status(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    let kind = if status.as_u16() == 429 {
        RemoteErrorKind::RateLimited
    } else {
        RemoteErrorKind::Api {
            status: status.as_u16(),
        }
    };
    Err(RemoteServiceError::new(operation, kind, message).into())
}

async fn parse_json<T: DeserializeOwned>(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    response
        .json::<T>()
        .await
        .map_err(|e| invalid_response(operation, e.to_string()))
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ArtistRefDto {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ArtistDto {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
}

impl ArtistDto {
    fn into_artist(self) -> Artist {
        Artist {
            id: self.id,
            name: self.name,
            genres: self.genres,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrackDto {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRefDto>,
}

#[derive(Debug, Deserialize)]
struct TrackPageDto {
    #[serde(default)]
    items: Vec<TrackDto>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseDto {
    tracks: TrackPageDto,
}

#[derive(Debug, Deserialize)]
struct SeveralArtistsDto {
    artists: Vec<ArtistDto>,
}

#[derive(Debug, Deserialize)]
struct AlbumDto {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRefDto>,
    tracks: TrackPageDto,
}

#[derive(Debug, Deserialize)]
struct RecommendationsDto {
    #[serde(default)]
    tracks: Vec<TrackDto>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistTracksRefDto {
    #[serde(default)]
    total: usize,
}

#[derive(Debug, Deserialize)]
struct PlaylistDto {
    id: String,
    name: String,
    #[serde(default)]
    tracks: PlaylistTracksRefDto,
}

impl PlaylistDto {
    fn into_playlist(self) -> Playlist {
        Playlist {
            id: self.id,
            name: self.name,
            track_count: self.tracks.total,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistPageDto {
    #[serde(default)]
    items: Vec<PlaylistDto>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemDto {
    track: Option<TrackDto>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsDto {
    #[serde(default)]
    items: Vec<PlaylistItemDto>,
}

#[derive(Debug, Deserialize)]
struct PlaylistDetailDto {
    id: String,
    name: String,
    tracks: PlaylistItemsDto,
}

#[derive(Debug, Serialize)]
struct CreatePlaylistBody<'a> {
    name: &'a str,
    description: &'a str,
    public: bool,
}

#[derive(Debug, Serialize)]
struct AddTracksBody {
    uris: Vec<String>,
}

fn track_from_dto(operation: &'static str, dto: TrackDto) -> Result<Track, CatalogError> {
    let artist = dto
        .artists
        .into_iter()
        .next()
        .ok_or_else(|| invalid_response(operation, format!("track {} has no artists", dto.id)))?;
    Ok(Track {
        id: dto.id,
        title: dto.name,
        primary_artist_id: artist.id,
        primary_artist_name: artist.name,
    })
}

fn tracks_from_dtos(
    operation: &'static str,
    dtos: Vec<TrackDto>,
) -> Result<Vec<Track>, CatalogError> {
    dtos.into_iter().map(|dto| track_from_dto(operation, dto)).collect()
}
