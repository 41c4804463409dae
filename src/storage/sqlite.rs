use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::{cache_key, CacheStore, Clock, WidgetCacheEntry};
use crate::error::{Error, Result};
use crate::models::Insights;

/// Widget cache persisted in a single SQLite table, one row per user.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Cache(format!("bad last_updated '{}': {}", raw, e)))
}

impl SqliteStore {
    /// Opens (or creates) the database and drops rows already past `ttl`.
    pub fn open<P: AsRef<Path>>(path: P, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, ttl, clock)
    }

    pub fn in_memory(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, ttl, clock)
    }

    fn with_connection(conn: Connection, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::init_db(&conn)?;
        let mut store = Self {
            conn: Mutex::new(conn),
            ttl,
            clock,
        };

        let cutoff = store.cutoff();
        let purged = Self::purge_before(store.conn.get_mut(), &cutoff)?;
        if purged > 0 {
            tracing::info!("Purged {} expired widget cache rows", purged);
        }

        Ok(store)
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS widget_cache (
                username TEXT PRIMARY KEY,
                insights_json TEXT NOT NULL,
                last_updated TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_widget_cache_last_updated ON widget_cache(last_updated);
            "#,
        )?;

        Ok(())
    }

    /// Rows stamped before this instant are expired. Fixed-width RFC 3339
    /// strings in UTC compare in time order.
    fn cutoff(&self) -> String {
        format_timestamp(&(self.clock.now() - self.ttl))
    }

    fn purge_before(conn: &Connection, cutoff: &str) -> Result<usize> {
        Ok(conn.execute(
            "DELETE FROM widget_cache WHERE last_updated <= ?1",
            params![cutoff],
        )?)
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn get(&self, username: &str) -> Result<Option<WidgetCacheEntry>> {
        let cutoff = self.cutoff();
        let conn = self.conn.lock().await;

        let row: Option<(String, String, String)> = conn
            .query_row(
                "SELECT username, insights_json, last_updated FROM widget_cache
                 WHERE username = ?1 AND last_updated > ?2",
                params![cache_key(username), cutoff],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((username, insights_json, last_updated)) = row else {
            return Ok(None);
        };

        let insights: Insights = serde_json::from_str(&insights_json)?;
        Ok(Some(WidgetCacheEntry {
            username,
            insights,
            last_updated: parse_timestamp(&last_updated)?,
        }))
    }

    async fn put(&self, entry: WidgetCacheEntry) -> Result<()> {
        let insights_json = serde_json::to_string(&entry.insights)?;
        let cutoff = self.cutoff();
        let conn = self.conn.lock().await;

        conn.execute(
            r#"
            INSERT INTO widget_cache (username, insights_json, last_updated)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(username) DO UPDATE SET
                insights_json = excluded.insights_json,
                last_updated = excluded.last_updated
            "#,
            params![
                cache_key(&entry.username),
                insights_json,
                format_timestamp(&entry.last_updated)
            ],
        )?;

        Self::purge_before(&conn, &cutoff)?;
        Ok(())
    }

    async fn invalidate(&self, username: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "DELETE FROM widget_cache WHERE username = ?1",
            params![cache_key(username)],
        )?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let cutoff = self.cutoff();
        let conn = self.conn.lock().await;
        Self::purge_before(&conn, &cutoff)
    }
}
