#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod clock;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod oauth;
pub mod query;
pub mod repos;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod telemetry;

// Re-exports for public API
pub use auth::{Claims, TokenError, TokenPayload, TokenService, UserRole};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, ProblemDetails};
pub use errors::ErrorCode;
pub use extractors::{AuthToken, CurrentUser, Superuser};
pub use infra::state::{build_state, StateBuilder};
pub use oauth::OAuthStateCache;
pub use query::{FilterValue, SearchQuery};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
pub use storage::{Storage, StorageError};

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::*;
    pub use super::error::*;
    pub use super::extractors::*;
    pub use super::query::*;
    pub use super::state::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
