use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::clock::Clock;

/// Keyed in-memory cache whose entries expire `ttl` after they were stamped.
/// Expired entries are never returned and are dropped lazily on read or in
/// bulk by [`TtlCache::purge_expired`].
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, (V, DateTime<Utc>)>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn expired(&self, stamped: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - stamped >= self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some((_, stamped)) => self.expired(*stamped, now),
            None => return None,
        };
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|(value, _)| value.clone())
    }

    pub async fn set(&self, key: &str, value: V) {
        let now = self.clock.now();
        self.set_at(key, value, now).await;
    }

    /// Inserts with an explicit stamp, e.g. the entry's own last-updated time.
    pub async fn set_at(&self, key: &str, value: V, stamped: DateTime<Utc>) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value, stamped));
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.lock().await.remove(key).is_some()
    }

    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, (_, stamped)| !self.expired(*stamped, now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
