//! Maestro Music Assistant Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod knowledge;
pub mod playlist;
pub mod profile;

// Re-export commonly used types for convenience
pub use agent::{default_registry, LlmReasoningEngine, Orchestrator, ToolContext, ToolRegistry};
pub use catalog::{CatalogClient, CatalogError, HttpCatalogClient};
pub use playlist::PlaylistBuilder;
pub use profile::{JsonProfileStore, ProfileAggregator, ProfileStore, UserProfile};
