use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;

use super::state::StateStore;
use super::OAuthError;
use crate::error::AppError;

const KEY_PREFIX: &str = "oauth_state:";

/// Shared state store for multi-instance deployments. Redis key expiry does
/// the eviction; the stored value is the unix expiry so reads still honour
/// the caller's clock.
#[derive(Clone)]
pub struct RedisStateStore {
    conn: ConnectionManager,
}

impl RedisStateStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|err| AppError::config(format!("Unable to connect to Redis: {err}")))?;
        Ok(Self { conn })
    }

    fn key(state: &str) -> String {
        format!("{KEY_PREFIX}{state}")
    }
}

fn store_err(err: redis::RedisError) -> OAuthError {
    OAuthError::Store(err.to_string())
}

fn to_instant(raw: Option<i64>) -> Option<OffsetDateTime> {
    raw.and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok())
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn put(&self, key: &str, expires_at: OffsetDateTime) -> Result<(), OAuthError> {
        let ttl_secs = (expires_at - OffsetDateTime::now_utc()).whole_seconds().max(1) as u64;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(key), expires_at.unix_timestamp(), ttl_secs)
            .await
            .map_err(store_err)
    }

    async fn get(&self, key: &str) -> Result<Option<OffsetDateTime>, OAuthError> {
        let mut conn = self.conn.clone();
        let raw: Option<i64> = conn.get(Self::key(key)).await.map_err(store_err)?;
        Ok(to_instant(raw))
    }

    async fn remove(&self, key: &str) -> Result<(), OAuthError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(key)).await.map_err(store_err)
    }

    async fn take(&self, key: &str) -> Result<Option<OffsetDateTime>, OAuthError> {
        let mut conn = self.conn.clone();
        let raw: Option<i64> = conn.get_del(Self::key(key)).await.map_err(store_err)?;
        Ok(to_instant(raw))
    }

    async fn purge_expired(&self, _now: OffsetDateTime) -> Result<usize, OAuthError> {
        // Redis evicts on its own.
        Ok(0)
    }
}
