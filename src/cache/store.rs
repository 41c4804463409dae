use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

use super::clock::Clock;
use super::ttl::TtlCache;
use super::{cache_key, WidgetCacheEntry};
use crate::error::Result;

/// Persistence behind the widget cache. Implementations enforce the absolute
/// TTL themselves: an entry older than the TTL is never returned by `get`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<WidgetCacheEntry>>;
    async fn put(&self, entry: WidgetCacheEntry) -> Result<()>;
    async fn invalidate(&self, username: &str) -> Result<()>;
    /// Deletes entries past the absolute TTL, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize>;
}

pub struct MemoryStore {
    entries: TtlCache<WidgetCacheEntry>,
}

impl MemoryStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: TtlCache::new(ttl, clock),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, username: &str) -> Result<Option<WidgetCacheEntry>> {
        Ok(self.entries.get(&cache_key(username)).await)
    }

    async fn put(&self, entry: WidgetCacheEntry) -> Result<()> {
        let key = cache_key(&entry.username);
        let stamped = entry.last_updated;
        self.entries.set_at(&key, entry, stamped).await;
        Ok(())
    }

    async fn invalidate(&self, username: &str) -> Result<()> {
        self.entries.invalidate(&cache_key(username)).await;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        Ok(self.entries.purge_expired().await)
    }
}
