//! External music knowledge sources beyond the user's own catalog.

mod lastfm;

pub use lastfm::{LastFmClient, SimilarArtist};
