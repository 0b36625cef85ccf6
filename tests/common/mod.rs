#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use lyricount::{
    Res,
    error::Error,
    genius::LyricsProvider,
    spotify::Catalog,
    types::{Album, LyricsResult},
};

/// In-memory catalog that counts how often it is asked for tracks.
#[derive(Default)]
pub struct FakeCatalog {
    pub artists: HashMap<String, String>,
    pub albums: HashMap<String, Vec<Album>>,
    pub tracks: HashMap<String, Vec<String>>,
    pub fail_tracks: bool,
    pub delay: Option<Duration>,
    pub track_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_album(album_id: &str, tracks: &[&str]) -> Self {
        let mut catalog = FakeCatalog::default();
        catalog.tracks.insert(
            album_id.to_string(),
            tracks.iter().map(|t| t.to_string()).collect(),
        );
        catalog
    }

    pub fn track_calls(&self) -> usize {
        self.track_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn find_artist_id(&self, name: &str) -> Res<Option<String>> {
        Ok(self.artists.get(&name.to_lowercase()).cloned())
    }

    async fn list_albums(&self, artist_id: &str) -> Res<Vec<Album>> {
        self.albums
            .get(artist_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(artist_id.to_string()))
    }

    async fn list_tracks(&self, album_id: &str) -> Res<Vec<String>> {
        self.track_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_tracks {
            return Err(Error::Lookup("catalog unreachable".to_string()));
        }
        Ok(self.tracks.get(album_id).cloned().unwrap_or_default())
    }
}

/// Lyrics keyed by track name. Unknown tracks have no lyrics.
#[derive(Default)]
pub struct FakeLyrics {
    pub songs: HashMap<String, Result<LyricsResult, String>>,
    pub calls: AtomicUsize,
}

impl FakeLyrics {
    pub fn song(mut self, track: &str, text: &str, art: Option<&str>) -> Self {
        self.songs.insert(
            track.to_string(),
            Ok(LyricsResult {
                text: text.to_string(),
                art_url: art.map(str::to_string),
            }),
        );
        self
    }

    pub fn failing(mut self, track: &str) -> Self {
        self.songs
            .insert(track.to_string(), Err("rate limited".to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsProvider for FakeLyrics {
    async fn fetch_lyrics(&self, track: &str, _artist: &str) -> Res<LyricsResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.songs.get(track) {
            Some(Ok(lyrics)) => Ok(lyrics.clone()),
            Some(Err(message)) => Err(Error::Provider(message.clone())),
            None => Ok(LyricsResult::default()),
        }
    }
}

pub fn album(id: &str, name: &str) -> Album {
    Album {
        id: id.to_string(),
        name: name.to_string(),
        release_date: None,
    }
}
