mod file_config;

pub use file_config::{
    AggregationConfig, CatalogConfig, FileConfig, LastFmConfig, LlmConfig, OrchestratorConfig,
};

use crate::catalog::{LimitPolicy, TimeWindow};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub username: Option<String>,
    pub profile_dir: Option<PathBuf>,
    pub catalog_url: Option<String>,
    pub llm_url: Option<String>,
    pub llm_model: Option<String>,
    pub max_tool_calls: usize,
    pub require_tool_use: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The catalog account the assistant acts on behalf of.
    pub username: String,
    /// Directory where listening profile history files live.
    pub profile_dir: PathBuf,

    pub catalog: CatalogSettings,
    pub aggregation: AggregationSettings,
    pub orchestrator: OrchestratorSettings,
    pub llm: LlmSettings,
    /// Present only when an API key is configured.
    pub lastfm: Option<LastFmSettings>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let username = file
            .username
            .or_else(|| cli.username.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("username must be specified via --username or in config file")
            })?;
        if username.trim().is_empty() {
            bail!("username must not be empty");
        }

        let profile_dir = file
            .profile_dir
            .map(PathBuf::from)
            .or_else(|| cli.profile_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("profile_dir must be specified via --profile-dir or in config file")
            })?;

        // Validate profile_dir exists
        if !profile_dir.exists() {
            bail!("Profile directory does not exist: {:?}", profile_dir);
        }
        if !profile_dir.is_dir() {
            bail!("profile_dir is not a directory: {:?}", profile_dir);
        }

        // Catalog settings - merge file config with defaults
        let cat_file = file.catalog.unwrap_or_default();
        let base_url = cat_file
            .base_url
            .or_else(|| cli.catalog_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "catalog base_url must be specified via --catalog-url or in config file"
                )
            })?;
        let limit_policy = cat_file
            .limit_policy
            .and_then(|s| LimitPolicy::from_str(&s))
            .unwrap_or_default();
        let catalog = CatalogSettings {
            base_url,
            bearer_token: cat_file.bearer_token,
            token_command: cat_file.token_command,
            timeout_secs: cat_file.timeout_secs.unwrap_or(30),
            artist_batch_limit: cat_file.artist_batch_limit.unwrap_or(50),
            seed_limit: cat_file.seed_limit.unwrap_or(5),
            limit_policy,
            max_retries: cat_file.max_retries.unwrap_or(2),
            initial_backoff_ms: cat_file.initial_backoff_ms.unwrap_or(500),
            max_backoff_ms: cat_file.max_backoff_ms.unwrap_or(5000),
            backoff_multiplier: cat_file.backoff_multiplier.unwrap_or(2.0),
        };

        // Aggregation settings
        let agg_file = file.aggregation.unwrap_or_default();
        let windows = match agg_file.windows {
            Some(names) => {
                let windows = parse_windows(&names);
                if windows.is_empty() {
                    bail!(
                        "aggregation windows must name at least one of \
                         short_term, medium_term, long_term"
                    );
                }
                windows
            }
            None => TimeWindow::all(),
        };
        let aggregation = AggregationSettings {
            windows,
            page_size: agg_file.page_size.unwrap_or(50),
            artist_batch_limit: agg_file.artist_batch_limit.unwrap_or(50),
        };

        // Orchestrator settings
        let orch_file = file.orchestrator.unwrap_or_default();
        let max_tool_calls = orch_file.max_tool_calls.unwrap_or(cli.max_tool_calls);
        if max_tool_calls == 0 {
            bail!("max_tool_calls must be at least 1");
        }
        let orchestrator = OrchestratorSettings {
            max_tool_calls,
            require_tool_use: orch_file.require_tool_use.unwrap_or(cli.require_tool_use),
        };

        // LLM settings
        let llm_file = file.llm.unwrap_or_default();
        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .or_else(|| cli.llm_url.clone())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: llm_file
                .model
                .or_else(|| cli.llm_model.clone())
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            api_key: llm_file.api_key,
            api_key_command: llm_file.api_key_command,
            temperature: llm_file.temperature.unwrap_or(0.3),
            max_tokens: llm_file.max_tokens,
            timeout_secs: llm_file.timeout_secs.unwrap_or(120),
        };

        // Last.fm is optional, enabled only when a key is present
        let lastfm = file.lastfm.and_then(|lf| {
            lf.api_key.map(|api_key| LastFmSettings {
                api_key,
                timeout_secs: lf.timeout_secs.unwrap_or(10),
            })
        });

        Ok(Self {
            username,
            profile_dir,
            catalog,
            aggregation,
            orchestrator,
            llm,
            lastfm,
        })
    }
}

/// Settings for the HTTP catalog client.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub token_command: Option<String>,
    pub timeout_secs: u64,
    pub artist_batch_limit: usize,
    pub seed_limit: usize,
    pub limit_policy: LimitPolicy,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            bearer_token: None,
            token_command: None,
            timeout_secs: 30,
            artist_batch_limit: 50,
            seed_limit: 5,
            limit_policy: LimitPolicy::Truncate,
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Settings for listening profile aggregation.
#[derive(Debug, Clone)]
pub struct AggregationSettings {
    /// Windows to aggregate, iterated in the order given.
    pub windows: Vec<TimeWindow>,
    /// How many top tracks to request per window.
    pub page_size: usize,
    /// How many distinct artists to look up genres for.
    pub artist_batch_limit: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            windows: TimeWindow::all(),
            page_size: 50,
            artist_batch_limit: 50,
        }
    }
}

/// Settings for the turn loop.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Hard cap on tool calls within a single turn.
    pub max_tool_calls: usize,
    /// When true, a final answer given before any tool ran is bounced back once.
    pub require_tool_use: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_tool_calls: 8,
            require_tool_use: false,
        }
    }
}

/// Settings for the chat completion provider.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_command: None,
            temperature: 0.3,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LastFmSettings {
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Parses window names, dropping anything unrecognized.
fn parse_windows(names: &[String]) -> Vec<TimeWindow> {
    names
        .iter()
        .filter_map(|s| TimeWindow::from_str(s))
        .collect()
}
