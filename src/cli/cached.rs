use tabled::Table;

use crate::{
    error, info,
    management::ResultCache,
    success,
    types::{CacheKey, CachedTableRow},
    utils, warning,
};

pub fn cached(cache: &ResultCache, artist: Option<String>) {
    let mut entries = match cache.entries() {
        Ok(entries) => entries,
        Err(e) => error!("Cannot read the result cache. Err: {}", e),
    };

    if let Some(artist) = artist {
        let search_term = artist.trim().to_lowercase();
        entries.retain(|(key, _)| key.artist.contains(&search_term));
    }

    if entries.is_empty() {
        info!("No cached results yet.");
        return;
    }

    let rows: Vec<CachedTableRow> = entries
        .into_iter()
        .map(|(key, entry)| CachedTableRow {
            artist: key.artist,
            album: key.album,
            word: key.word,
            count: entry.count,
            art: entry.album_art.unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn forget(cache: &ResultCache, artist: String, album: String, word: String) {
    let word = match utils::validate_word(&word) {
        Ok(w) => w,
        Err(e) => error!("{}", e),
    };
    let key = CacheKey::new(&artist, &album, &word);

    match cache.remove(&key) {
        Ok(true) => success!("Forgot the cached result for {}.", key),
        Ok(false) => warning!("Nothing cached for {}.", key),
        Err(e) => error!("Cannot update the result cache. Err: {}", e),
    }
}
