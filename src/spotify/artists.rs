use reqwest::Client;

use crate::{Res, spotify::fetch_json, types::ArtistSearchResponse};

/// Resolves an artist name to the id of the first matching catalog artist.
///
/// Returns `Ok(None)` when the search yields no artist. Transport failures
/// and unexpected statuses surface as [`crate::error::Error::Lookup`].
///
/// # Example
///
/// ```ignore
/// let id = find_artist_id(&client, "https://api.spotify.com/v1", &token, "radiohead").await?;
/// ```
pub async fn find_artist_id(
    client: &Client,
    api_url: &str,
    token: &str,
    name: &str,
) -> Res<Option<String>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    let request = client
        .get(format!("{}/search", api_url))
        .query(&[("q", name), ("type", "artist"), ("limit", "1")]);

    let response: Option<ArtistSearchResponse> =
        fetch_json(request, token, &format!("artist search '{}'", name)).await?;

    Ok(response.and_then(|r| r.artists.items.into_iter().next().map(|a| a.id)))
}
