//! Listening profile aggregation and persistence.

mod aggregator;
mod models;
mod store;

pub use aggregator::ProfileAggregator;
pub use models::{TopArtists, TopGenres, TopTracks, UserProfile};
pub use store::{JsonProfileStore, ProfileStore, ProfileStoreError};
