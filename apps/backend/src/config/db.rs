use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use super::env::{must_var, parse_var};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub pool_size: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            url: must_var("DATABASE_URL")?,
            pool_size: parse_var("DB_POOL_SIZE", 20)?,
        })
    }

    /// Opens the pool. Does NOT run migrations.
    pub async fn connect(&self) -> Result<DatabaseConnection, AppError> {
        let mut opts = ConnectOptions::new(self.url.clone());
        opts.max_connections(self.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        info!(pool_size = self.pool_size, "Connecting to database");
        Database::connect(opts)
            .await
            .map_err(|e| AppError::db_unavailable(format!("database connect failed: {e}")))
    }
}
