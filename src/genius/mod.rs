//! # Lyrics Provider
//!
//! Looks up the lyrics and cover art of a track. The song is found through
//! the Genius search API; its page is then downloaded and the lyrics are
//! scraped out of one of a few known containers (see [`scrape`]).
//!
//! A failure is reported per track as [`crate::error::Error::Provider`]. The
//! counting engine turns it into an empty result so a single track never
//! aborts an album count.

pub mod scrape;
pub mod search;

use async_trait::async_trait;
use reqwest::Client;

use crate::{Res, config::Config, error::Error, types::LyricsResult, utils};

#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Lyrics text and cover-art URL for a track.
    ///
    /// An unknown song is not an error: it yields an empty text and no art.
    async fn fetch_lyrics(&self, track: &str, artist: &str) -> Res<LyricsResult>;
}

/// [`LyricsProvider`] backed by the Genius API and song pages.
pub struct GeniusClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GeniusClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.genius_api_url.clone(),
            token: config.genius_access_token.clone(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    async fn fetch_lyrics(&self, track: &str, artist: &str) -> Res<LyricsResult> {
        let Some(token) = self.token.as_deref() else {
            return Err(Error::Provider("GENIUS_ACCESS_TOKEN is not set".to_string()));
        };

        let Some(song) = search::search_song(&self.client, &self.api_url, token, track, artist).await? else {
            tracing::debug!(track, artist, "no lyrics search hit");
            return Ok(LyricsResult::default());
        };

        let art_url = utils::sanitize_art_url(song.song_art_image_url);
        let html = search::fetch_page(&self.client, &song.url).await?;

        let text = scrape::extract_lyrics(&html).unwrap_or_else(|| {
            tracing::debug!(track, url = %song.url, "no lyrics container on page");
            String::new()
        });

        Ok(LyricsResult { text, art_url })
    }
}
