//! Last.fm API client for music knowledge lookups.
//!
//! Rate limited to 5 requests per second per Last.fm API guidelines.

use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::LastFmSettings;

const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";
const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(200); // 5 req/sec

/// A similar artist as returned by Last.fm.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarArtist {
    pub name: String,
    pub score: f64,
}

pub struct LastFmClient {
    client: reqwest::Client,
    api_key: String,
    last_request: Mutex<Instant>,
}

#[derive(Deserialize)]
struct SimilarArtistsResponse {
    similarartists: Option<SimilarArtistsContainer>,
}

#[derive(Deserialize)]
struct SimilarArtistsContainer {
    artist: Option<Vec<LastFmArtist>>,
}

#[derive(Deserialize)]
struct LastFmArtist {
    name: Option<String>,
    #[serde(rename = "match")]
    match_score: Option<String>,
}

impl LastFmClient {
    pub fn new(settings: &LastFmSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            last_request: Mutex::new(Instant::now() - RATE_LIMIT_INTERVAL),
        })
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < RATE_LIMIT_INTERVAL {
            tokio::time::sleep(RATE_LIMIT_INTERVAL - elapsed).await;
        }
        *last = Instant::now();
    }

    /// Get artists similar to the named one, strongest match first.
    pub async fn similar_artists(
        &self,
        artist_name: &str,
        limit: usize,
    ) -> Result<Vec<SimilarArtist>> {
        if artist_name.trim().is_empty() {
            anyhow::bail!("artist name must not be empty");
        }
        self.rate_limit().await;

        let response = self
            .client
            .get(LASTFM_API_BASE)
            .query(&[
                ("method", "artist.getsimilar"),
                ("artist", artist_name),
                ("api_key", &self.api_key),
                ("format", "json"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            if response.status().as_u16() == 429 {
                // Rate limited
                return Ok(vec![]);
            }
            anyhow::bail!("Last.fm API failed with status {}", response.status());
        }

        let body: SimilarArtistsResponse = response.json().await?;

        let artists = body
            .similarartists
            .and_then(|sa| sa.artist)
            .unwrap_or_default();

        let results: Vec<SimilarArtist> = artists
            .into_iter()
            .filter_map(|a| {
                let name = a.name?;
                let score: f64 = a
                    .match_score
                    .as_deref()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.0);
                Some(SimilarArtist { name, score })
            })
            .collect();

        Ok(results)
    }
}
