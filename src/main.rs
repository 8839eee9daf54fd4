use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use maestro::agent::{
    default_registry, prompts, LlmReasoningEngine, OpenAiProvider, Orchestrator, ToolContext,
};
use maestro::agent::{CompletionOptions, LlmProvider};
use maestro::catalog::{CatalogClient, HttpCatalogClient};
use maestro::config::{self, AppConfig, CatalogSettings, LlmSettings};
use maestro::knowledge::LastFmClient;
use maestro::playlist::PlaylistBuilder;
use maestro::profile::{JsonProfileStore, ProfileAggregator};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Catalog username the assistant acts on behalf of.
    /// Can also be specified in config file.
    #[clap(long)]
    pub username: Option<String>,

    /// Directory where listening profile history is stored.
    #[clap(long, value_parser = parse_path)]
    pub profile_dir: Option<PathBuf>,

    /// Base URL of the music catalog service.
    #[clap(long)]
    pub catalog_url: Option<String>,

    /// Base URL of the chat completion API.
    #[clap(long)]
    pub llm_url: Option<String>,

    /// Model to request from the chat completion API.
    #[clap(long)]
    pub llm_model: Option<String>,

    /// Maximum number of tool calls the assistant may make in one turn.
    #[clap(long, default_value_t = 8)]
    pub max_tool_calls: usize,

    /// Bounce a final answer given before any tool ran back to the model once.
    #[clap(long)]
    pub require_tool_use: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            username: args.username.clone(),
            profile_dir: args.profile_dir.clone(),
            catalog_url: args.catalog_url.clone(),
            llm_url: args.llm_url.clone(),
            llm_model: args.llm_model.clone(),
            max_tool_calls: args.max_tool_calls,
            require_tool_use: args.require_tool_use,
        }
    }
}

/// Resolves the catalog bearer token: a static value wins, then the token
/// command, then the CATALOG_TOKEN environment variable.
async fn resolve_catalog_token(settings: &CatalogSettings) -> Result<String> {
    if let Some(token) = &settings.bearer_token {
        return Ok(token.clone());
    }
    if let Some(command) = &settings.token_command {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .with_context(|| format!("Failed to run catalog token command: {}", command))?;
        if !output.status.success() {
            anyhow::bail!(
                "Catalog token command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            anyhow::bail!("Catalog token command produced no output");
        }
        return Ok(token);
    }
    std::env::var("CATALOG_TOKEN").context(
        "No catalog token: set catalog.bearer_token or catalog.token_command in the config \
         file, or the CATALOG_TOKEN environment variable",
    )
}

fn build_provider(settings: &LlmSettings) -> OpenAiProvider {
    if let Some(command) = &settings.api_key_command {
        return OpenAiProvider::with_key_command(
            settings.base_url.clone(),
            settings.model.clone(),
            command.clone(),
        );
    }
    let api_key = settings
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());
    if api_key.is_none() {
        warn!("No LLM API key configured, requests will be unauthenticated");
    }
    OpenAiProvider::new(settings.base_url.clone(), settings.model.clone(), api_key)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "Starting maestro {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  username: {}", app_config.username);
    info!("  profile_dir: {:?}", app_config.profile_dir);
    info!("  catalog: {}", app_config.catalog.base_url);
    info!(
        "  llm: {} ({})",
        app_config.llm.base_url, app_config.llm.model
    );
    info!(
        "  max_tool_calls: {}",
        app_config.orchestrator.max_tool_calls
    );

    // Catalog client
    let token = resolve_catalog_token(&app_config.catalog).await?;
    let catalog = Arc::new(HttpCatalogClient::new(&app_config.catalog, token)?)
        as Arc<dyn CatalogClient>;

    // Profile store and aggregation
    let profiles = Arc::new(JsonProfileStore::new(app_config.profile_dir.clone()));
    let aggregator = Arc::new(ProfileAggregator::new(
        catalog.clone(),
        &app_config.aggregation,
    ));
    let playlists = Arc::new(PlaylistBuilder::new(catalog.clone()));

    // Last.fm artist knowledge, only when a key is configured
    let knowledge = match &app_config.lastfm {
        Some(settings) => {
            info!("Last.fm artist knowledge enabled");
            Some(Arc::new(LastFmClient::new(settings)?))
        }
        None => None,
    };

    let registry = Arc::new(default_registry(knowledge.is_some()));
    info!("Registered {} tools", registry.len());

    let ctx = ToolContext::new(catalog, aggregator, profiles, playlists, knowledge);

    // Reasoning engine
    let provider = Arc::new(build_provider(&app_config.llm));
    if let Err(e) = provider.health_check().await {
        warn!(
            "LLM backend at {} is not answering: {}",
            app_config.llm.base_url, e
        );
    }
    let options = CompletionOptions {
        temperature: app_config.llm.temperature,
        max_tokens: app_config.llm.max_tokens,
        timeout: std::time::Duration::from_secs(app_config.llm.timeout_secs),
    };
    let engine = Arc::new(LlmReasoningEngine::new(provider, options));

    let orchestrator = Orchestrator::new(
        engine,
        registry,
        ctx,
        &app_config.orchestrator,
        prompts::system_prompt(&app_config.username),
    );

    info!("Ready! Type a message, or 'exit' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "exit" || message == "quit" {
            break;
        }

        match orchestrator.run_turn(message).await {
            Ok(turn) => match turn.final_message() {
                Some(answer) => println!("\n{}\n", answer),
                None => warn!("Turn ended without a message"),
            },
            Err(e) => {
                error!("Turn failed: {}", e);
                println!("\nSomething went wrong on my side, please try again.\n");
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
