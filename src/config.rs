//! Configuration management for lyricount.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Variables already set in the process
//! environment take precedence over the file.
//!
//! Everything is read once into a [`Config`] value which is then handed to
//! the clients that need it; nothing reads the environment afterwards.

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` in the local data directory.
///
/// The directory is created when missing so users know where to put the
/// file:
/// - Linux: `~/.local/share/lyricount/.env`
/// - macOS: `~/Library/Application Support/lyricount/.env`
/// - Windows: `%LOCALAPPDATA%/lyricount/.env`
///
/// A missing `.env` file is not an error; the process environment alone may
/// carry all settings.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists
/// but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the per-user data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lyricount");
    path
}

/// Runtime settings shared by every collaborator of the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_url: String,
    pub spotify_token_url: String,
    pub genius_access_token: Option<String>,
    pub genius_api_url: String,
    pub cache_path: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `SPOTIFY_CLIENT_ID` | unset |
    /// | `SPOTIFY_CLIENT_SECRET` | unset |
    /// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
    /// | `SPOTIFY_API_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
    /// | `GENIUS_ACCESS_TOKEN` | unset |
    /// | `GENIUS_API_URL` | `https://api.genius.com` |
    /// | `LYRICOUNT_CACHE_PATH` | `<data dir>/lyrics_cache.db` |
    /// | `LYRICOUNT_HTTP_TIMEOUT_SECS` | `10` |
    ///
    /// Missing credentials are not reported here; the token exchange fails
    /// with an authentication error instead.
    pub fn from_env() -> Self {
        let http_timeout = optional("LYRICOUNT_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Self {
            spotify_client_id: optional("SPOTIFY_CLIENT_ID"),
            spotify_client_secret: optional("SPOTIFY_CLIENT_SECRET"),
            spotify_api_url: with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            spotify_token_url: with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_API_TOKEN_URL),
            genius_access_token: optional("GENIUS_ACCESS_TOKEN"),
            genius_api_url: with_default("GENIUS_API_URL", DEFAULT_GENIUS_API_URL),
            cache_path: optional("LYRICOUNT_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("lyrics_cache.db")),
            http_timeout: Duration::from_secs(http_timeout),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn with_default(key: &str, default: &str) -> String {
    optional(key)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
