use std::collections::HashSet;

use reqwest::Url;

use crate::{Res, error::Error, types::Album};

/// Canonicalizes text for word comparison.
///
/// Lowercases, drops every character outside `[a-z0-9]` and whitespace, and
/// collapses whitespace runs to a single space. Applying it twice yields the
/// same string as applying it once.
pub fn normalize(text: &str) -> String {
    let filtered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Counts whole-token occurrences of `word` in `text`.
///
/// Both sides are normalized identically, so "cat" never matches inside
/// "category". A word that normalizes to nothing, or to more than one token,
/// never matches.
pub fn count_occurrences(text: &str, word: &str) -> u64 {
    let needle = normalize(word);
    if needle.is_empty() {
        return 0;
    }

    normalize(text)
        .split(' ')
        .filter(|token| *token == needle)
        .count() as u64
}

/// Keeps an album art value only if it is an absolute http(s) URL.
pub fn sanitize_art_url(art: Option<String>) -> Option<String> {
    let art = art?;
    match Url::parse(art.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(art.trim().to_string()),
        _ => None,
    }
}

/// Drops albums whose id was already seen, keeping catalog order.
pub fn remove_duplicate_albums(albums: &mut Vec<Album>) {
    let mut seen_ids = HashSet::new();
    albums.retain(|album| seen_ids.insert(album.id.clone()));
}

/// Picks an album by exact id, falling back to a case-insensitive name match.
///
/// Names are display-only: when several ids share the name the caller has to
/// choose one explicitly.
pub fn resolve_album<'a>(albums: &'a [Album], query: &str) -> Res<&'a Album> {
    let query = query.trim();
    if let Some(album) = albums.iter().find(|a| a.id == query) {
        return Ok(album);
    }

    let wanted = query.to_lowercase();
    let matches: Vec<&Album> = albums
        .iter()
        .filter(|a| a.name.trim().to_lowercase() == wanted)
        .collect();

    match matches.as_slice() {
        [] => Err(Error::NotFound(format!("album '{}'", query))),
        [album] => Ok(album),
        many => Err(Error::AmbiguousAlbum {
            name: query.to_string(),
            candidates: many.iter().map(|a| a.id.clone()).collect(),
        }),
    }
}

/// Rejects search words that cannot match anything.
pub fn validate_word(word: &str) -> Res<String> {
    let normalized = normalize(word);
    if normalized.is_empty() {
        return Err(Error::InvalidInput(format!(
            "'{}' has no letters or digits to count",
            word
        )));
    }
    if normalized.contains(' ') {
        return Err(Error::InvalidInput(format!(
            "'{}' must be a single word",
            word
        )));
    }
    Ok(normalized)
}
