use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;

use crate::{
    Res,
    error::Error,
    types::{AccessToken, TokenResponse},
};

/// Exchanges client credentials for a bearer token.
///
/// Sends `grant_type=client_credentials` to the token endpoint with the id
/// and secret in a Basic `Authorization` header. The returned token carries
/// the time it was obtained so its expiry can be tracked.
///
/// # Errors
///
/// Returns [`Error::Auth`] when either credential is missing or empty, when
/// the endpoint cannot be reached, answers with a non-success status, or
/// returns a body without an access token.
pub async fn request_token(
    client: &Client,
    token_url: &str,
    client_id: Option<&str>,
    client_secret: Option<&str>,
) -> Res<AccessToken> {
    let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
        return Err(Error::Auth(
            "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set".to_string(),
        ));
    };
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(Error::Auth("client credentials must not be empty".to_string()));
    }

    let basic = STANDARD.encode(format!("{}:{}", client_id, client_secret));

    let response = client
        .post(token_url)
        .header(reqwest::header::AUTHORIZATION, format!("Basic {}", basic))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| Error::Auth(format!("token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Auth(format!(
            "token endpoint answered with status {}",
            status.as_u16()
        )));
    }

    let json: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("malformed token response: {}", e)))?;

    if json.access_token.is_empty() {
        return Err(Error::Auth("token response carried no access token".to_string()));
    }

    Ok(AccessToken {
        access_token: json.access_token,
        token_type: json.token_type,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
