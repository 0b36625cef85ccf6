use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{Res, spotify::auth::request_token, types::AccessToken};

/// Seconds before the reported expiry at which a token is renewed.
pub const EXPIRY_MARGIN_SECS: u64 = 240;

/// Holds the catalog token and renews it through the client-credentials
/// exchange once it is about to expire.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(
        client: Client,
        token_url: String,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        TokenManager {
            client,
            token_url,
            client_id,
            client_secret,
            token: Mutex::new(None),
        }
    }

    /// Returns a bearer token that is not about to expire, exchanging
    /// credentials when none is held yet or the held one is stale.
    pub async fn get_valid_token(&self) -> Res<String> {
        let mut lock = self.token.lock().await;

        if let Some(token) = lock.as_ref() {
            if !is_expired(token, Utc::now().timestamp() as u64) {
                return Ok(token.access_token.clone());
            }
            tracing::debug!("catalog token expired, requesting a new one");
        }

        let token = request_token(
            &self.client,
            &self.token_url,
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        )
        .await?;
        let access_token = token.access_token.clone();
        *lock = Some(token);

        Ok(access_token)
    }

    pub async fn current_token(&self) -> Option<AccessToken> {
        self.token.lock().await.clone()
    }
}

/// Whether `token` must be renewed at unix time `now`.
pub fn is_expired(token: &AccessToken, now: u64) -> bool {
    now.saturating_add(EXPIRY_MARGIN_SECS) >= token.obtained_at.saturating_add(token.expires_in)
}
