use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::clock::Clock;
use super::store::CacheStore;
use super::validate_username;
use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::models::insights::Insights;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetCacheEntry {
    pub username: String,
    pub insights: Insights,
    pub last_updated: DateTime<Utc>,
}

/// Produces a fresh insights aggregate for a user.
#[async_trait]
pub trait InsightsGenerator: Send + Sync {
    async fn generate(&self, username: &str, refresh: bool) -> Result<Insights>;
}

/// Read-through cache of insights per username.
///
/// A miss or an entry at least `stale_after` old triggers regeneration and a
/// whole-entry overwrite; fresher entries are served as stored. Concurrent
/// regenerations of the same user are not coalesced and the last write wins.
pub struct WidgetCache {
    store: Arc<dyn CacheStore>,
    generator: Arc<dyn InsightsGenerator>,
    clock: Arc<dyn Clock>,
    stale_after: Duration,
}

impl WidgetCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        generator: Arc<dyn InsightsGenerator>,
        clock: Arc<dyn Clock>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            stale_after: config.stale_after,
        }
    }

    pub fn is_fresh(&self, entry: &WidgetCacheEntry) -> bool {
        self.clock.now() - entry.last_updated < self.stale_after
    }

    /// Returns cached insights when fresh, otherwise regenerates and stores
    /// them. `refresh` skips the cache read entirely.
    pub async fn get_or_generate(&self, username: &str, refresh: bool) -> Result<Insights> {
        let username = validate_username(username)?;

        if !refresh {
            match self.store.get(username).await {
                Ok(Some(entry)) if self.is_fresh(&entry) => {
                    tracing::debug!("Widget cache hit for {}", username);
                    return Ok(entry.insights);
                }
                Ok(Some(entry)) => {
                    tracing::info!(
                        "Cached insights for {} are stale (updated {})",
                        username,
                        entry.last_updated
                    );
                }
                Ok(None) => tracing::debug!("Widget cache miss for {}", username),
                // The put below overwrites the row.
                Err(Error::Serialization(e)) => {
                    tracing::warn!("Discarding unreadable cached insights for {}: {}", username, e);
                }
                Err(e) => return Err(e),
            }
        }

        let insights = self.generator.generate(username, refresh).await?;

        self.store
            .put(WidgetCacheEntry {
                username: username.to_string(),
                insights: insights.clone(),
                last_updated: self.clock.now(),
            })
            .await?;

        Ok(insights)
    }

    /// Like [`WidgetCache::get_or_generate`] but never fails: any fetch or
    /// store error is logged and reported as no data.
    pub async fn lookup(&self, username: &str, refresh: bool) -> Option<Insights> {
        match self.get_or_generate(username, refresh).await {
            Ok(insights) => Some(insights),
            Err(e) if e.is_retryable() => {
                tracing::warn!("Insights for {} temporarily unavailable: {}", username, e);
                None
            }
            Err(e) => {
                tracing::warn!("No insights available for {}: {}", username, e);
                None
            }
        }
    }

    pub async fn invalidate(&self, username: &str) -> Result<()> {
        self.store.invalidate(username).await
    }
}
