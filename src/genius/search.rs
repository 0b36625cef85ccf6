use reqwest::Client;

use crate::{
    Res,
    error::Error,
    types::{GeniusSearchResponse, GeniusSong},
};

/// Searches the lyrics API for "<track> <artist>" and returns the top hit.
///
/// # Errors
///
/// [`Error::Provider`] on transport failures, non-success statuses or an
/// unreadable body.
pub async fn search_song(
    client: &Client,
    api_url: &str,
    token: &str,
    track: &str,
    artist: &str,
) -> Res<Option<GeniusSong>> {
    let query = format!("{} {}", track.trim(), artist.trim());

    let response = client
        .get(format!("{}/search", api_url))
        .query(&[("q", query.as_str())])
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| Error::Provider(format!("search '{}': {}", query, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Provider(format!(
            "search '{}': status {}",
            query,
            status.as_u16()
        )));
    }

    let json: GeniusSearchResponse = response
        .json()
        .await
        .map_err(|e| Error::Provider(format!("search '{}': malformed response: {}", query, e)))?;

    Ok(json.response.hits.into_iter().next().map(|hit| hit.result))
}

/// Downloads the HTML of a song page.
pub async fn fetch_page(client: &Client, url: &str) -> Res<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Provider(format!("page {}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Provider(format!(
            "page {}: status {}",
            url,
            status.as_u16()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| Error::Provider(format!("page {}: {}", url, e)))
}
