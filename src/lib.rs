//! Lyrics word-frequency lookup.
//!
//! Given an artist, an album and a word, lyricount fetches the album's track
//! listing from a music catalog, retrieves the lyrics of every track, counts
//! whole-word occurrences of the word and caches the result keyed by
//! (artist, album, word), so asking again costs no network calls.
//!
//! # Modules
//!
//! - `cli` - Command-line presentation of the pipeline
//! - `config` - Configuration from environment variables and `.env`
//! - `counter` - Counting engine over catalog and lyrics provider
//! - `error` - Error taxonomy
//! - `genius` - Lyrics provider (Genius search + page scraping)
//! - `management` - Result cache and catalog token management
//! - `service` - Cache-transparent, single-flight `WordCounter`
//! - `spotify` - Catalog client (Spotify Web API)
//! - `types` - Data structures and type definitions
//! - `utils` - Text normalization and counting helpers
//!
//! # Example
//!
//! ```
//! use lyricount::{config, service::WordCounter};
//!
//! #[tokio::main]
//! async fn main() -> lyricount::Res<()> {
//!     let counter = WordCounter::connect(&config::Config::from_env()).await?;
//!     let result = counter.count_word("radiohead", "album-id", "ok computer", "paranoid").await?;
//!     println!("{} occurrences", result.count);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod genius;
pub mod management;
pub mod service;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// Result type used throughout the crate.
///
/// # Example
///
/// ```
/// use lyricount::Res;
///
/// fn word() -> Res<String> {
///     Ok("love".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational line with a blue bullet.
///
/// ```
/// info!("Looking up albums of {}...", artist);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a result line with a green checkmark.
///
/// ```
/// success!("'{}' appears {} times", word, count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error with a red exclamation mark to stderr and exits with
/// status 1.
///
/// Only for failures the command cannot recover from, such as a rejected
/// catalog token at startup.
///
/// ```
/// error!("Cannot authenticate with the catalog: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning with a yellow exclamation mark.
///
/// ```
/// warning!("No data for album '{}'", album);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
