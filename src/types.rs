use std::fmt;

use serde::Deserialize;
use tabled::Tabled;

use crate::utils;

/// Bearer credential obtained through the client-credentials exchange.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: Page<Artist>,
}

/// Offset-paginated list as returned by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub name: String,
    pub id: String,
    pub released: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSearchResponse {
    pub response: GeniusHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHits {
    #[serde(default)]
    pub hits: Vec<GeniusHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHit {
    pub result: GeniusSong,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSong {
    pub url: String,
    #[serde(default)]
    pub song_art_image_url: Option<String>,
}

/// Lyrics of a single track. Discarded once counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsResult {
    pub text: String,
    pub art_url: Option<String>,
}

/// Primary key of the result cache.
///
/// Artist and album are trimmed and lower-cased, the word goes through the
/// text normalizer so that every spelling that counts the same shares a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub artist: String,
    pub album: String,
    pub word: String,
}

impl CacheKey {
    pub fn new(artist: &str, album: &str, word: &str) -> Self {
        Self {
            artist: artist.trim().to_lowercase(),
            album: album.trim().to_lowercase(),
            word: utils::normalize(word),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.artist, self.album, self.word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub count: u64,
    pub album_art: Option<String>,
}

impl CacheEntry {
    /// Builds an entry, dropping any art value that is not an http(s) URL.
    pub fn new(count: u64, album_art: Option<String>) -> Self {
        Self {
            count,
            album_art: utils::sanitize_art_url(album_art),
        }
    }
}

#[derive(Tabled)]
pub struct CachedTableRow {
    pub artist: String,
    pub album: String,
    pub word: String,
    pub count: u64,
    pub art: String,
}

/// What the pipeline hands to its callers, cached or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountResult {
    pub count: u64,
    pub album_art: Option<String>,
}

impl From<CacheEntry> for CountResult {
    fn from(entry: CacheEntry) -> Self {
        Self {
            count: entry.count,
            album_art: entry.album_art,
        }
    }
}

impl From<&CountResult> for CacheEntry {
    fn from(result: &CountResult) -> Self {
        CacheEntry::new(result.count, result.album_art.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackProgress {
    pub track: String,
    /// 1-based position of the track in catalog order.
    pub index: usize,
    pub total: usize,
}

/// Events of a streaming count. Progress events come in track order and are
/// always followed by exactly one terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountEvent {
    Progress(TrackProgress),
    Finished(CountResult),
    Failed { message: String, no_data: bool },
}
