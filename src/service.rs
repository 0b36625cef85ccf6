//! Cache-transparent word counting.
//!
//! [`WordCounter`] is the one context object the presentation layer talks
//! to. It owns the catalog, the lyrics provider and the result cache, and
//! makes sure that concurrent requests for the same key run the expensive
//! lookup chain only once.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use reqwest::Client;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::{
    Res,
    config::Config,
    counter::CountingEngine,
    error::Error,
    genius::{GeniusClient, LyricsProvider},
    management::ResultCache,
    spotify::{Catalog, SpotifyClient},
    types::{Album, CacheEntry, CacheKey, CountEvent, CountResult},
    utils,
};

/// Capacity of the event channel of a streaming count.
pub const EVENT_BUFFER: usize = 16;

type FlightLock = Arc<tokio::sync::Mutex<()>>;

pub struct WordCounter {
    catalog: Arc<dyn Catalog>,
    lyrics: Arc<dyn LyricsProvider>,
    cache: Arc<ResultCache>,
    in_flight: Mutex<HashMap<CacheKey, FlightLock>>,
}

impl WordCounter {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        lyrics: Arc<dyn LyricsProvider>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            catalog,
            lyrics,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Wires up the Spotify catalog, the Genius provider and the on-disk
    /// cache described by `config`.
    ///
    /// The catalog token is requested right away, so missing or rejected
    /// credentials fail here with [`Error::Auth`].
    pub async fn connect(config: &Config) -> Res<Self> {
        let cache = ResultCache::open(&config.cache_path)?;
        tracing::debug!(path = %config.cache_path.display(), "result cache opened");
        Self::connect_with_cache(config, Arc::new(cache)).await
    }

    /// Like [`WordCounter::connect`], over a cache the caller already opened.
    pub async fn connect_with_cache(config: &Config, cache: Arc<ResultCache>) -> Res<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("cannot build http client: {}", e)))?;

        let spotify = SpotifyClient::new(http.clone(), config);
        spotify.authenticate().await?;

        let genius = GeniusClient::new(http, config);
        if !genius.has_token() {
            tracing::warn!("GENIUS_ACCESS_TOKEN is not set, every track will count as zero");
        }

        Ok(Self::new(Arc::new(spotify), Arc::new(genius), cache))
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Number of keys with a count in progress.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Albums of the first artist matching `artist`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no artist matches or the artist has no
    /// albums, [`Error::Lookup`] when the catalog cannot be queried.
    pub async fn albums_for_artist(&self, artist: &str) -> Res<Vec<Album>> {
        let Some(artist_id) = self.catalog.find_artist_id(artist).await? else {
            return Err(Error::NotFound(format!("artist '{}'", artist.trim())));
        };

        let albums = self.catalog.list_albums(&artist_id).await?;
        if albums.is_empty() {
            return Err(Error::NotFound(format!("albums of '{}'", artist.trim())));
        }
        Ok(albums)
    }

    /// Counts `word` in the album, answering from the cache when possible.
    ///
    /// A cached and a freshly computed result are indistinguishable. Catalog
    /// failures are returned as errors and are not cached; a catalog miss is
    /// cached as a zero count.
    pub async fn count_word(
        &self,
        artist: &str,
        album_id: &str,
        album_name: &str,
        word: &str,
    ) -> Res<CountResult> {
        self.count_with_progress(artist, album_id, album_name, word, None)
            .await
    }

    /// Streaming variant of [`WordCounter::count_word`].
    ///
    /// The returned channel carries one [`CountEvent::Progress`] per track
    /// (none on a cache hit) followed by exactly one `Finished` or `Failed`
    /// event. The channel is bounded, so a slow reader slows the count down
    /// instead of losing events.
    pub fn stream_count_word(
        self: &Arc<Self>,
        artist: &str,
        album_id: &str,
        album_name: &str,
        word: &str,
    ) -> Receiver<CountEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let this = Arc::clone(self);
        let (artist, album_id, album_name, word) = (
            artist.to_string(),
            album_id.to_string(),
            album_name.to_string(),
            word.to_string(),
        );

        tokio::spawn(async move {
            let terminal = match this
                .count_with_progress(&artist, &album_id, &album_name, &word, Some(&tx))
                .await
            {
                Ok(result) => CountEvent::Finished(result),
                Err(e) => CountEvent::Failed {
                    no_data: e.is_no_data(),
                    message: e.to_string(),
                },
            };
            if tx.send(terminal).await.is_err() {
                tracing::debug!("count stream receiver dropped before the result");
            }
        });

        rx
    }

    async fn count_with_progress(
        &self,
        artist: &str,
        album_id: &str,
        album_name: &str,
        word: &str,
        progress: Option<&Sender<CountEvent>>,
    ) -> Res<CountResult> {
        let word = utils::validate_word(word)?;
        let key = CacheKey::new(artist, album_name, &word);

        let flight = self.acquire_flight(&key);
        let _held = flight.lock.lock().await;
        self.lookup_or_count(&key, artist.trim(), album_id, &word, progress)
            .await
    }

    async fn lookup_or_count(
        &self,
        key: &CacheKey,
        artist: &str,
        album_id: &str,
        word: &str,
        progress: Option<&Sender<CountEvent>>,
    ) -> Res<CountResult> {
        if let Some(entry) = self.cache.get(key)? {
            tracing::debug!(%key, "cache hit");
            return Ok(entry.into());
        }
        tracing::debug!(%key, "cache miss");

        let engine = CountingEngine::new(self.catalog.as_ref(), self.lyrics.as_ref());
        let computed = engine.count_word(album_id, artist, word, progress).await?;
        let entry = CacheEntry::from(&computed);

        match self.cache.put(key, &entry) {
            Ok(()) => Ok(entry.into()),
            Err(Error::CacheWriteConflict(_)) => {
                tracing::debug!(%key, "lost the write race, reading the stored row");
                match self.cache.get(key)? {
                    Some(stored) => Ok(stored.into()),
                    None => Ok(entry.into()),
                }
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "could not store the result");
                Ok(entry.into())
            }
        }
    }

    fn acquire_flight(&self, key: &CacheKey) -> Flight<'_> {
        let mut flights = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        Flight {
            flights: &self.in_flight,
            key: key.clone(),
            lock: Arc::clone(flights.entry(key.clone()).or_default()),
        }
    }
}

/// Membership in the single-flight map for one key.
///
/// Dropping it leaves the map, also when the owning future is cancelled
/// while still waiting for the lock.
struct Flight<'a> {
    flights: &'a Mutex<HashMap<CacheKey, FlightLock>>,
    key: CacheKey,
    lock: FlightLock,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        let mut flights = self.flights.lock().unwrap_or_else(|p| p.into_inner());
        // one reference in the map, one held here: nobody else waits
        if Arc::strong_count(&self.lock) == 2 {
            flights.remove(&self.key);
        }
    }
}

/// Answers a count from the cache alone, without any network call.
///
/// `album` is matched as typed (case-insensitively), so it only hits rows
/// stored under that album name.
///
/// # Errors
///
/// [`Error::InvalidInput`] for a word that cannot be counted,
/// [`Error::Storage`] when the cache cannot be read.
pub fn cached_count(
    cache: &ResultCache,
    artist: &str,
    album: &str,
    word: &str,
) -> Res<Option<CountResult>> {
    let word = utils::validate_word(word)?;
    let key = CacheKey::new(artist, album, &word);
    Ok(cache.get(&key)?.map(CountResult::from))
}
