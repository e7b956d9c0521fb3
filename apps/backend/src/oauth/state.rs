//! Short-lived CSRF state for the OAuth redirect round trip.
//!
//! Each state key moves `absent -> active -> (consumed | expired)`. The
//! backing map lives behind [`StateStore`] so several instances can share a
//! Redis store while tests and single-node deployments use memory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::OAuthError;
use crate::clock::{Clock, SystemClock};
use crate::logging::pii::Redacted;

pub const STATE_TTL: Duration = Duration::minutes(5);

/// How often [`OAuthStateCache::spawn_sweeper`] purges abandoned flows.
pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn put(&self, key: &str, expires_at: OffsetDateTime) -> Result<(), OAuthError>;
    async fn get(&self, key: &str) -> Result<Option<OffsetDateTime>, OAuthError>;
    async fn remove(&self, key: &str) -> Result<(), OAuthError>;
    /// Atomic get-and-remove.
    async fn take(&self, key: &str) -> Result<Option<OffsetDateTime>, OAuthError>;
    /// Drops entries with `expires_at <= now`, returning how many went.
    async fn purge_expired(&self, now: OffsetDateTime) -> Result<usize, OAuthError>;
}

/// Whole map behind one lock; reads lock too.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, OffsetDateTime>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn put(&self, key: &str, expires_at: OffsetDateTime) -> Result<(), OAuthError> {
        self.entries.lock().insert(key.to_string(), expires_at);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<OffsetDateTime>, OAuthError> {
        Ok(self.entries.lock().get(key).copied())
    }

    async fn remove(&self, key: &str) -> Result<(), OAuthError> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<OffsetDateTime>, OAuthError> {
        Ok(self.entries.lock().remove(key))
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> Result<usize, OAuthError> {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        Ok(before - entries.len())
    }
}

#[derive(Clone)]
pub struct OAuthStateCache {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl std::fmt::Debug for OAuthStateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthStateCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl OAuthStateCache {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            ttl: STATE_TTL,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStateStore::new()))
    }

    /// State derived from the origin alone: the same origin always yields
    /// the same key, so concurrent flows from one origin share an entry and
    /// each call pushes its expiry out again.
    pub async fn create(&self, origin: &str) -> Result<String, OAuthError> {
        let state = blake3::hash(origin.as_bytes()).to_hex().to_string();
        self.store.put(&state, self.clock.now() + self.ttl).await?;
        Ok(state)
    }

    /// Per-flow state: origin mixed with a random nonce.
    pub async fn create_nonced(&self, origin: &str) -> Result<String, OAuthError> {
        let nonce: [u8; 16] = rand::random();
        let mut hasher = blake3::Hasher::new();
        hasher.update(origin.as_bytes());
        hasher.update(&nonce);
        let state = hasher.finalize().to_hex().to_string();
        self.store.put(&state, self.clock.now() + self.ttl).await?;
        Ok(state)
    }

    /// True while the state is active. A successful check leaves the entry
    /// in place, so the same state passes again until it expires; use
    /// [`consume`](Self::consume) for single use.
    pub async fn check(&self, state: &str) -> Result<bool, OAuthError> {
        let Some(expires_at) = self.store.get(state).await? else {
            return Ok(false);
        };
        if expires_at <= self.clock.now() {
            debug!(state = %Redacted(state), "OAuth state expired");
            self.store.remove(state).await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Single-use check: the entry is removed whether it was active or expired.
    pub async fn consume(&self, state: &str) -> Result<bool, OAuthError> {
        match self.store.take(state).await? {
            Some(expires_at) => Ok(expires_at > self.clock.now()),
            None => Ok(false),
        }
    }

    pub async fn purge_expired(&self) -> Result<usize, OAuthError> {
        self.store.purge_expired(self.clock.now()).await
    }

    /// Purges expired entries every `every`, starting immediately. The task
    /// holds only a weak handle and stops once the store is dropped.
    pub fn spawn_sweeper(&self, every: std::time::Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(&self.store);
        let clock = self.clock.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                match store.purge_expired(clock.now()).await {
                    Ok(0) => {}
                    Ok(purged) => debug!(purged, "Swept expired OAuth states"),
                    Err(err) => warn!(error = %err, "OAuth state sweep failed"),
                }
            }
            debug!("OAuth state sweeper stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::clock::ManualClock;

    fn cache() -> (OAuthStateCache, Arc<MemoryStateStore>, ManualClock) {
        let clock = ManualClock::new(datetime!(2025-02-02 12:00 UTC));
        let store = Arc::new(MemoryStateStore::new());
        let cache = OAuthStateCache::with_clock(store.clone(), Arc::new(clock.clone()));
        (cache, store, clock)
    }

    #[tokio::test]
    async fn expired_check_removes_the_entry() {
        let (cache, store, clock) = cache();
        let state = cache.create("https://app.example").await.unwrap();
        assert_eq!(store.len(), 1);

        clock.advance(STATE_TTL);
        assert!(!cache.check(&state).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn nonced_states_differ_per_flow() {
        let (cache, _, _) = cache();
        let a = cache.create_nonced("https://app.example").await.unwrap();
        let b = cache.create_nonced("https://app.example").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn purge_drops_only_expired_entries() {
        let (cache, store, clock) = cache();
        cache.create("old").await.unwrap();
        clock.advance(Duration::minutes(3));
        let fresh = cache.create("new").await.unwrap();
        clock.advance(Duration::minutes(3));

        assert_eq!(cache.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(cache.check(&fresh).await.unwrap());
    }
}
