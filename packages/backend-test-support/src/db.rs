//! In-memory SQLite databases for repository and query tests.

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Open a fresh in-memory SQLite database and apply all migrations.
///
/// The pool is pinned to a single connection: every SQLite `:memory:`
/// connection is its own database, so a second pooled connection would see
/// an empty schema.
pub async fn memory_db() -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    migrate(&db, MigrationCommand::Up).await?;
    Ok(db)
}
