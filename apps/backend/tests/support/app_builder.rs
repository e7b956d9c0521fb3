use std::sync::Arc;

use starter_backend::clock::ManualClock;
use starter_backend::storage::LocalStorage;
use starter_backend::{build_state, AppState, SecurityConfig};
use sea_orm::DatabaseConnection;

/// Fresh in-memory SQLite with all migrations applied.
pub async fn test_db() -> DatabaseConnection {
    backend_test_support::db::memory_db()
        .await
        .expect("in-memory database should migrate")
}

/// State over `db` with a random secret and a throwaway storage root.
pub async fn test_state(db: DatabaseConnection) -> AppState {
    let root = std::env::temp_dir().join(format!("starter-tests-{}", uuid::Uuid::new_v4()));
    build_state()
        .with_db(db)
        .with_security(SecurityConfig::for_tests())
        .with_storage(Arc::new(LocalStorage::new(root)))
        .build()
        .await
        .expect("state should build")
}

/// State without a database whose token clock is `clock`.
pub async fn state_with_clock(clock: ManualClock) -> AppState {
    build_state()
        .with_security(SecurityConfig::for_tests())
        .with_clock(Arc::new(clock))
        .build()
        .await
        .expect("state should build")
}
