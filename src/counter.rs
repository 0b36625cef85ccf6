//! Counting engine: tracks of an album → lyrics → whole-token word count.
//!
//! The engine holds no state between calls and never touches the result
//! cache; storing its output is up to the caller.

use tokio::sync::mpsc::Sender;

use crate::{
    Res,
    genius::LyricsProvider,
    spotify::Catalog,
    types::{CountEvent, CountResult, LyricsResult, TrackProgress},
    utils,
};

pub struct CountingEngine<'a> {
    catalog: &'a dyn Catalog,
    lyrics: &'a dyn LyricsProvider,
}

impl<'a> CountingEngine<'a> {
    pub fn new(catalog: &'a dyn Catalog, lyrics: &'a dyn LyricsProvider) -> Self {
        Self { catalog, lyrics }
    }

    /// Counts `word` across the lyrics of every track of an album.
    ///
    /// Tracks are visited strictly in catalog order. The album art is taken
    /// from the first track that has one. A track whose lyrics cannot be
    /// fetched contributes zero; an album without tracks yields `(0, None)`
    /// without asking the lyrics provider at all.
    ///
    /// When `progress` is given, a [`CountEvent::Progress`] is sent before
    /// each track is fetched. Sending waits for room in the channel; a
    /// dropped receiver is ignored and never changes the result.
    ///
    /// # Errors
    ///
    /// Only catalog failures are returned ([`crate::error::Error::Lookup`],
    /// [`crate::error::Error::Auth`]).
    pub async fn count_word(
        &self,
        album_id: &str,
        artist: &str,
        word: &str,
        progress: Option<&Sender<CountEvent>>,
    ) -> Res<CountResult> {
        let tracks = self.catalog.list_tracks(album_id).await?;
        if tracks.is_empty() {
            tracing::debug!(album_id, "album has no tracks");
            return Ok(CountResult {
                count: 0,
                album_art: None,
            });
        }

        let total = tracks.len();
        let mut count = 0u64;
        let mut album_art: Option<String> = None;

        for (i, track) in tracks.iter().enumerate() {
            if let Some(tx) = progress {
                let event = CountEvent::Progress(TrackProgress {
                    track: track.clone(),
                    index: i + 1,
                    total,
                });
                if tx.send(event).await.is_err() {
                    tracing::debug!("progress receiver dropped");
                }
            }

            let lyrics = match self.lyrics.fetch_lyrics(track, artist).await {
                Ok(lyrics) => lyrics,
                Err(e) => {
                    tracing::warn!(track = %track, error = %e, "lyrics unavailable, counting as zero");
                    LyricsResult::default()
                }
            };

            if !lyrics.text.is_empty() {
                count += utils::count_occurrences(&lyrics.text, word);
            }

            if album_art.is_none() {
                album_art = utils::sanitize_art_url(lyrics.art_url);
            }
        }

        Ok(CountResult { count, album_art })
    }
}
