//! OAuth CSRF state and the Google authorization-code flow.

pub mod google;
pub mod redis_store;
pub mod state;

use thiserror::Error;

pub use google::{GoogleIdentity, GoogleOAuthClient};
pub use redis_store::RedisStateStore;
pub use state::{MemoryStateStore, OAuthStateCache, StateStore, STATE_TTL, SWEEP_INTERVAL};

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth state is unknown, expired or already used")]
    InvalidState,
    #[error("OAuth provider request timed out")]
    Timeout,
    #[error("OAuth provider request failed: {0}")]
    Transport(String),
    #[error("OAuth provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("OAuth token response has no id_token")]
    MissingIdToken,
    #[error("OAuth id_token is unusable: {0}")]
    InvalidIdToken(String),
    #[error("OAuth state store failed: {0}")]
    Store(String),
}
