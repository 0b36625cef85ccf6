use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    error,
    error::Error,
    info,
    management::ResultCache,
    service::{self, WordCounter},
    success,
    types::{Album, CountEvent, CountResult},
    utils, warning,
};

pub async fn count(
    config: &Config,
    cache: Arc<ResultCache>,
    artist: String,
    album: String,
    word: String,
) {
    let word = match utils::validate_word(&word) {
        Ok(w) => w,
        Err(e) => error!("{}", e),
    };

    // a name as typed can hit; an album id falls through to the lookup
    match service::cached_count(&cache, &artist, &album, &word) {
        Ok(Some(result)) => {
            tracing::debug!("answered from the result cache");
            report(&word, album.trim(), result);
            return;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "cannot read the result cache"),
    }

    let counter = match WordCounter::connect_with_cache(config, cache).await {
        Ok(counter) => Arc::new(counter),
        Err(e) => error!("Cannot start. Err: {}", e),
    };

    let album = resolve(&counter, &artist, &album).await;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{bar:30.blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut events = counter.stream_count_word(&artist, &album.id, &album.name, &word);
    while let Some(event) = events.recv().await {
        match event {
            CountEvent::Progress(p) => {
                pb.set_length(p.total as u64);
                pb.set_position(p.index.saturating_sub(1) as u64);
                pb.set_message(p.track);
            }
            CountEvent::Finished(result) => {
                pb.finish_and_clear();
                report(&word, &album.name, result);
                return;
            }
            CountEvent::Failed { message, no_data } => {
                pb.finish_and_clear();
                if no_data {
                    tracing::debug!(error = %message, "count returned no data");
                    warning!("No data for '{}'.", album.name);
                    return;
                }
                error!("Cannot count '{}'. Err: {}", word, message);
            }
        }
    }

    pb.finish_and_clear();
    warning!("The count ended without a result.");
}

fn report(word: &str, album: &str, result: CountResult) {
    success!("'{}' appears {} times in '{}'.", word, result.count, album);
    if let Some(art) = result.album_art {
        info!("Album art: {}", art);
    }
}

async fn resolve(counter: &WordCounter, artist: &str, album: &str) -> Album {
    let pb = super::spinner(&format!("Looking up albums of {}...", artist.trim()));
    let albums = counter.albums_for_artist(artist).await;
    pb.finish_and_clear();

    let albums = match albums {
        Ok(albums) => albums,
        Err(e) if e.is_no_data() => {
            tracing::debug!(error = %e, "album lookup returned no data");
            warning!("No albums found for '{}'.", artist.trim());
            std::process::exit(1);
        }
        Err(e) => error!("Cannot list albums. Err: {}", e),
    };

    match utils::resolve_album(&albums, album) {
        Ok(found) => found.clone(),
        Err(Error::AmbiguousAlbum { name, candidates }) => {
            let matching: Vec<Album> = albums
                .into_iter()
                .filter(|a| candidates.contains(&a.id))
                .collect();
            warning!("Several albums are named '{}', pass one of the ids:", name);
            println!("{}", super::albums::album_table(matching));
            std::process::exit(1);
        }
        Err(_) => {
            warning!("'{}' is not an album of '{}'. Known albums:", album, artist.trim());
            println!("{}", super::albums::album_table(albums));
            std::process::exit(1);
        }
    }
}
