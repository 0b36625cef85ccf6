mod auth;
mod cache;

pub use auth::EXPIRY_MARGIN_SECS;
pub use auth::TokenManager;
pub use auth::is_expired;
pub use cache::ResultCache;
