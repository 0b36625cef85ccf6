//! Error taxonomy for the lookup-and-count pipeline.
//!
//! The catalog distinguishes a genuine miss ([`Error::NotFound`]) from a
//! failed request ([`Error::Lookup`]) so the two can be logged and cached
//! differently, while [`Error::is_no_data`] lets the presentation layer show
//! both as "no data".

use thiserror::Error;

use crate::types::CacheKey;

#[derive(Debug, Error)]
pub enum Error {
    /// Client-credentials exchange failed or credentials are missing.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The catalog answered, but has nothing for the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport failure or unexpected status from the catalog.
    #[error("catalog lookup failed: {0}")]
    Lookup(String),

    /// Lyrics for a single track could not be fetched.
    #[error("lyrics provider failed: {0}")]
    Provider(String),

    #[error("a cached result already exists for {0}")]
    CacheWriteConflict(CacheKey),

    #[error("album name '{name}' is ambiguous, use one of the ids: {}", candidates.join(", "))]
    AmbiguousAlbum {
        name: String,
        candidates: Vec<String>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cache storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors the end user should simply see as "no data".
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Lookup(_))
    }
}
