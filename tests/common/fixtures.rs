//! Builders assembling real components around the stub catalog.

use std::sync::Arc;

use maestro::agent::prompts;
use maestro::agent::{default_registry, Directive, Orchestrator, ToolContext};
use maestro::catalog::{Artist, CatalogClient, Track};
use maestro::config::{AggregationSettings, OrchestratorSettings};
use maestro::playlist::PlaylistBuilder;
use maestro::profile::{JsonProfileStore, ProfileAggregator, ProfileStore};
use tempfile::TempDir;

use super::catalog::StubCatalog;
use super::constants::TEST_USER;
use super::engine::ScriptedEngine;

/// A track whose primary artist is `artist_id`.
pub fn track(id: &str, artist_id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {}", id),
        primary_artist_id: artist_id.to_string(),
        primary_artist_name: format!("Artist {}", artist_id),
    }
}

pub fn artist(id: &str, genres: &[&str]) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("Artist {}", id),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

/// Real components wired to one [`StubCatalog`], with profile storage in a
/// temporary directory that lives as long as the app.
pub struct TestApp {
    pub catalog: Arc<StubCatalog>,
    pub profiles: Arc<JsonProfileStore>,
    pub aggregator: Arc<ProfileAggregator>,
    pub playlists: Arc<PlaylistBuilder>,
    pub ctx: ToolContext,
    pub profile_dir: TempDir,
}

pub fn test_app(catalog: StubCatalog) -> TestApp {
    let profile_dir = TempDir::new().unwrap();
    let catalog = Arc::new(catalog);
    let client = catalog.clone() as Arc<dyn CatalogClient>;
    let profiles = Arc::new(JsonProfileStore::new(profile_dir.path()));
    let aggregator = Arc::new(ProfileAggregator::new(
        client.clone(),
        &AggregationSettings::default(),
    ));
    let playlists = Arc::new(PlaylistBuilder::new(client.clone()));
    let ctx = ToolContext::new(
        client,
        aggregator.clone(),
        profiles.clone() as Arc<dyn ProfileStore>,
        playlists.clone(),
        None,
    );
    TestApp {
        catalog,
        profiles,
        aggregator,
        playlists,
        ctx,
        profile_dir,
    }
}

/// An orchestrator over the full default tool registry, with the model
/// replaced by a fixed script.
pub fn scripted_orchestrator(
    app: &TestApp,
    directives: Vec<Directive>,
    settings: OrchestratorSettings,
) -> Orchestrator {
    Orchestrator::new(
        Arc::new(ScriptedEngine::new(directives)),
        Arc::new(default_registry(false)),
        app.ctx.clone(),
        &settings,
        prompts::system_prompt(TEST_USER),
    )
}
