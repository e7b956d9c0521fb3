use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::TokenService;
use crate::error::AppError;
use crate::oauth::{GoogleOAuthClient, OAuthStateCache};
use crate::storage::Storage;
use crate::tasks::TaskQueue;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    pub tokens: TokenService,
    pub storage: Arc<dyn Storage>,
    pub oauth_states: OAuthStateCache,
    /// Present only when Google credentials are configured
    pub google: Option<GoogleOAuthClient>,
    /// Present only when a mailer is configured
    pub tasks: Option<TaskQueue>,
}

impl AppState {
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::db_unavailable("Database not configured"))
    }

    pub fn require_google(&self) -> Result<&GoogleOAuthClient, AppError> {
        self.google
            .as_ref()
            .ok_or_else(|| AppError::config("Google sign-in is not configured"))
    }

    pub fn require_tasks(&self) -> Result<&TaskQueue, AppError> {
        self.tasks
            .as_ref()
            .ok_or_else(|| AppError::config("Mail delivery is not configured"))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &self.security)
            .field("oauth_states", &self.oauth_states)
            .field("google", &self.google.is_some())
            .field("tasks", &self.tasks.is_some())
            .finish_non_exhaustive()
    }
}
