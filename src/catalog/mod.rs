//! Typed access to the remote music catalog.
//!
//! [`CatalogClient`] is the seam the rest of the crate programs against:
//! aggregation, playlist building and the agent tools all take it as
//! `Arc<dyn CatalogClient>`, so tests can swap in fakes and a different
//! backend only needs a new implementation. [`HttpCatalogClient`] is the
//! production implementation.

mod client;
mod error;
mod http;
mod models;
mod retry;

pub use client::{BatchLimits, CatalogClient, LimitPolicy};
pub use error::{CatalogError, RemoteErrorKind, RemoteServiceError};
pub use http::HttpCatalogClient;
pub use models::{
    Album, Artist, Playlist, PlaylistWithTracks, RecommendationSeed, TimeWindow, Track,
};
pub use retry::RetryPolicy;

#[cfg(feature = "mock")]
pub use client::MockCatalogClient;
