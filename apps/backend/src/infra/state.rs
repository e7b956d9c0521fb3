use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::auth::TokenService;
use crate::clock::{Clock, SystemClock};
use crate::config::env::opt_var;
use crate::config::{
    DbConfig, Environment, GoogleOAuthConfig, LocalStorageConfig, SmtpConfig, SuperuserConfig,
};
use crate::error::AppError;
use crate::oauth::{
    GoogleOAuthClient, MemoryStateStore, OAuthStateCache, RedisStateStore, StateStore,
    SWEEP_INTERVAL,
};
use crate::services::auth::ensure_superuser;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::storage::{storage_from_env, LocalStorage, Storage};
use crate::tasks::{Mailer, SmtpMailer, TaskQueue};

enum DbSource {
    Config(DbConfig),
    Connection(DatabaseConnection),
}

/// Builder for creating AppState instances (used in both tests and startup)
pub struct StateBuilder {
    security_config: SecurityConfig,
    clock: Arc<dyn Clock>,
    db: Option<DbSource>,
    storage: Option<Arc<dyn Storage>>,
    state_store: Option<Arc<dyn StateStore>>,
    google: Option<GoogleOAuthConfig>,
    mailer: Option<Arc<dyn Mailer>>,
    superuser: Option<SuperuserConfig>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::for_tests(),
            clock: Arc::new(SystemClock),
            db: None,
            storage: None,
            state_store: None,
            google: None,
            mailer: None,
            superuser: None,
        }
    }

    /// Reads every concern from the process environment. Optional pieces
    /// (Redis, Google, SMTP, bootstrap superuser) are enabled only when their
    /// variables are set.
    pub async fn from_env() -> Result<Self, AppError> {
        let environment = Environment::from_env()?;
        info!(?environment, "Loading configuration from environment");

        let mut builder = Self::new()
            .with_security(SecurityConfig::from_env()?)
            .with_db_config(DbConfig::from_env()?)
            .with_storage(storage_from_env(environment)?);

        if let Some(url) = opt_var("REDIS_URL") {
            builder = builder.with_state_store(Arc::new(RedisStateStore::connect(&url).await?));
        }
        if opt_var("GOOGLE_CLIENT_ID").is_some() {
            builder = builder.with_google(GoogleOAuthConfig::from_env()?);
        }
        if opt_var("SMTP_SERVER").is_some() {
            let mailer = SmtpMailer::new(&SmtpConfig::from_env()?)?;
            builder = builder.with_mailer(Arc::new(mailer));
        }
        if let Some(superuser) = SuperuserConfig::from_env()? {
            builder = builder.with_superuser(superuser);
        }
        Ok(builder)
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
    /// Connect during `build`.
    pub fn with_db_config(mut self, config: DbConfig) -> Self {
        self.db = Some(DbSource::Config(config));
        self
    }
    /// Use an already-open (and migrated) connection.
    pub fn with_db(mut self, conn: DatabaseConnection) -> Self {
        self.db = Some(DbSource::Connection(conn));
        self
    }
    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }
    pub fn with_state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }
    pub fn with_google(mut self, config: GoogleOAuthConfig) -> Self {
        self.google = Some(config);
        self
    }
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }
    /// Seed this superuser during `build`. Needs a database.
    pub fn with_superuser(mut self, config: SuperuserConfig) -> Self {
        self.superuser = Some(config);
        self
    }

    /// Must run inside a tokio runtime: the OAuth state sweeper and, when a
    /// mailer is set, the task worker are spawned here.
    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db {
            Some(DbSource::Config(config)) => Some(config.connect().await?),
            Some(DbSource::Connection(conn)) => Some(conn),
            None => None,
        };

        if let Some(superuser) = &self.superuser {
            let conn = db.as_ref().ok_or_else(|| {
                AppError::config("SUPERUSER_EMAIL is set but no database is configured")
            })?;
            ensure_superuser(conn, &superuser.email, &superuser.password).await?;
        }

        let tokens = TokenService::with_clock(self.security_config.clone(), self.clock.clone());
        let storage = self.storage.unwrap_or_else(|| {
            Arc::new(LocalStorage::new(LocalStorageConfig::from_env().root))
        });
        let store = self
            .state_store
            .unwrap_or_else(|| Arc::new(MemoryStateStore::new()));
        let oauth_states = OAuthStateCache::with_clock(store, self.clock);
        // Stops by itself once the last state handle is dropped.
        let _sweeper = oauth_states.spawn_sweeper(SWEEP_INTERVAL);

        let google = self
            .google
            .map(|config| GoogleOAuthClient::new(config, oauth_states.clone()))
            .transpose()?;

        let tasks = self.mailer.map(|mailer| {
            let (queue, _worker) = TaskQueue::start(mailer);
            queue
        });

        Ok(AppState {
            db,
            security: self.security_config,
            tokens,
            storage,
            oauth_states,
            google,
            tasks,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
