use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub username: Option<String>,
    pub profile_dir: Option<String>,

    // Component tables
    pub catalog: Option<CatalogConfig>,
    pub aggregation: Option<AggregationConfig>,
    pub orchestrator: Option<OrchestratorConfig>,
    pub llm: Option<LlmConfig>,
    pub lastfm: Option<LastFmConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub bearer_token: Option<String>,
    /// Shell command that prints a bearer token on stdout.
    pub token_command: Option<String>,
    pub timeout_secs: Option<u64>,
    pub artist_batch_limit: Option<usize>,
    pub seed_limit: Option<usize>,
    /// What to do when a batch exceeds its limit: "truncate" or "reject".
    pub limit_policy: Option<String>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub backoff_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AggregationConfig {
    /// Windows to aggregate, e.g. ["short_term", "medium_term", "long_term"].
    pub windows: Option<Vec<String>>,
    pub page_size: Option<usize>,
    pub artist_batch_limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub max_tool_calls: Option<usize>,
    pub require_tool_use: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Shell command that prints the API key on stdout.
    pub api_key_command: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LastFmConfig {
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
