//! Playlist construction.

mod builder;

pub use builder::{PlaylistBuilder, PlaylistError};
