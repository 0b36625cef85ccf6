use reqwest::Client;

use crate::{
    Res,
    error::Error,
    spotify::fetch_json,
    types::{Album, Page, Track},
    utils,
};

/// Catalog page size for album and track listings.
pub const PAGE_LIMIT: u32 = 50;

/// Upper bound on followed `next` links, guards against a looping catalog.
const MAX_PAGES: usize = 40;

/// Lists every album of an artist in catalog order.
///
/// Follows the `next` links of the paginated endpoint. Albums are keyed by
/// id: a repeated id is dropped, a repeated name is kept since names are
/// display-only.
///
/// # Errors
///
/// [`Error::NotFound`] if the catalog does not know the artist id,
/// [`Error::Lookup`] on transport failures or unexpected statuses.
pub async fn list_albums(client: &Client, api_url: &str, token: &str, artist_id: &str) -> Res<Vec<Album>> {
    let first = client
        .get(format!("{}/artists/{}/albums", api_url, artist_id))
        .query(&[("limit", PAGE_LIMIT)]);

    let Some(mut albums) = collect_pages::<Album>(client, first, token, "albums").await? else {
        return Err(Error::NotFound(format!("artist id '{}'", artist_id)));
    };

    utils::remove_duplicate_albums(&mut albums);
    Ok(albums)
}

/// Lists the track names of an album in catalog order.
///
/// An album id the catalog does not know yields an empty list: a miss is a
/// legitimate zero for counting purposes, not an error.
///
/// # Errors
///
/// [`Error::Lookup`] on transport failures or unexpected statuses.
pub async fn list_tracks(client: &Client, api_url: &str, token: &str, album_id: &str) -> Res<Vec<String>> {
    let first = client
        .get(format!("{}/albums/{}/tracks", api_url, album_id))
        .query(&[("limit", PAGE_LIMIT)]);

    let tracks = collect_pages::<Track>(client, first, token, "tracks")
        .await?
        .unwrap_or_default();

    Ok(tracks.into_iter().map(|t| t.name).collect())
}

/// Fetches the first page and every page linked through `next`.
///
/// Returns `Ok(None)` when the first page is reported missing.
async fn collect_pages<T: serde::de::DeserializeOwned>(
    client: &Client,
    first: reqwest::RequestBuilder,
    token: &str,
    what: &str,
) -> Res<Option<Vec<T>>> {
    let Some(page) = fetch_json::<Page<T>>(first, token, what).await? else {
        return Ok(None);
    };

    let mut items = page.items;
    let mut next = page.next;
    let mut fetched = 1;

    while let Some(url) = next.take() {
        if fetched >= MAX_PAGES {
            tracing::warn!(what, pages = fetched, "stopping pagination early");
            break;
        }

        match fetch_json::<Page<T>>(client.get(&url), token, what).await? {
            Some(page) => {
                items.extend(page.items);
                next = page.next;
            }
            None => break,
        }
        fetched += 1;
    }

    Ok(Some(items))
}
