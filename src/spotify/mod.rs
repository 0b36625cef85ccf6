//! # Catalog Client
//!
//! Resolves an artist name to its albums and an album to its track names
//! through the Spotify Web API. Requests are authenticated with a bearer
//! token obtained through the OAuth2 client-credentials exchange and renewed
//! by [`TokenManager`] before it expires.
//!
//! ```text
//! artist name ──search──▶ artist id ──albums──▶ [Album{id,name}]
//!                                               album id ──tracks──▶ [track name]
//! ```
//!
//! ## Error reporting
//!
//! The catalog distinguishes two kinds of "no data":
//! - a miss (404/400 or an empty search), reported as `Ok(None)`, an empty
//!   list or [`Error::NotFound`] depending on the call;
//! - a failure (transport error, timeout, any other status), reported as
//!   [`Error::Lookup`].
//!
//! A rejected token (401) is an [`Error::Auth`].
//!
//! ## Modules
//!
//! - [`auth`] - client-credentials token exchange
//! - [`artists`] - artist search
//! - [`albums`] - paginated album and track listings

pub mod albums;
pub mod artists;
pub mod auth;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{Res, config::Config, error::Error, management::TokenManager, types::Album};

/// Music catalog consumed by the counting pipeline.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Id of the first artist matching `name`, if any.
    async fn find_artist_id(&self, name: &str) -> Res<Option<String>>;

    /// Albums of an artist, unique by id, in catalog order.
    async fn list_albums(&self, artist_id: &str) -> Res<Vec<Album>>;

    /// Track names of an album in catalog order; empty for an unknown album.
    async fn list_tracks(&self, album_id: &str) -> Res<Vec<String>>;
}

/// [`Catalog`] backed by the Spotify Web API.
pub struct SpotifyClient {
    client: Client,
    api_url: String,
    tokens: TokenManager,
}

impl SpotifyClient {
    pub fn new(client: Client, config: &Config) -> Self {
        let tokens = TokenManager::new(
            client.clone(),
            config.spotify_token_url.clone(),
            config.spotify_client_id.clone(),
            config.spotify_client_secret.clone(),
        );

        Self {
            client,
            api_url: config.spotify_api_url.clone(),
            tokens,
        }
    }

    /// Obtains the first token eagerly so bad credentials fail at startup.
    pub async fn authenticate(&self) -> Res<()> {
        self.tokens.get_valid_token().await.map(|_| ())
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn find_artist_id(&self, name: &str) -> Res<Option<String>> {
        let token = self.tokens.get_valid_token().await?;
        artists::find_artist_id(&self.client, &self.api_url, &token, name).await
    }

    async fn list_albums(&self, artist_id: &str) -> Res<Vec<Album>> {
        let token = self.tokens.get_valid_token().await?;
        albums::list_albums(&self.client, &self.api_url, &token, artist_id).await
    }

    async fn list_tracks(&self, album_id: &str) -> Res<Vec<String>> {
        let token = self.tokens.get_valid_token().await?;
        albums::list_tracks(&self.client, &self.api_url, &token, album_id).await
    }
}

/// Sends an authenticated catalog request and decodes its JSON body.
///
/// 404 and 400 (unknown or malformed id) map to `Ok(None)`, 401 to
/// [`Error::Auth`], everything else that is not a success to
/// [`Error::Lookup`].
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    token: &str,
    what: &str,
) -> Res<Option<T>> {
    let response = request
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| Error::Lookup(format!("{}: {}", what, e)))?;

    match response.status() {
        status if status.is_success() => {
            let json = response
                .json::<T>()
                .await
                .map_err(|e| Error::Lookup(format!("{}: malformed response: {}", what, e)))?;
            Ok(Some(json))
        }
        StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
            tracing::debug!(what, status = response.status().as_u16(), "catalog has no data");
            Ok(None)
        }
        StatusCode::UNAUTHORIZED => Err(Error::Auth(format!("{}: token rejected", what))),
        status => Err(Error::Lookup(format!(
            "{}: unexpected status {}",
            what,
            status.as_u16()
        ))),
    }
}
