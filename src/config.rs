use crate::error::{Error, Result};
use chrono::Duration;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub database_path: String,
    pub concurrency_limit: usize,
    pub include_forks: bool,
    pub timezone_offset_minutes: i32,
    pub max_commit_repos: usize,
    pub max_commits_per_repo: u32,
    pub cache_stale_hours: i64,
    pub cache_ttl_days: i64,
    pub raw_cache_ttl_secs: i64,
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .map_err(|_| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))?;

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "gitinsights.db".to_string());

        let include_forks = env::var("INCLUDE_FORKS")
            .ok()
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let config = Self {
            github_token,
            database_path,
            concurrency_limit: parsed_var("CONCURRENCY_LIMIT", 5),
            include_forks,
            timezone_offset_minutes: parsed_var("TIMEZONE_OFFSET_MINUTES", 0),
            max_commit_repos: parsed_var("MAX_COMMIT_REPOS", 5),
            max_commits_per_repo: parsed_var("MAX_COMMITS_PER_REPO", 30),
            cache_stale_hours: parsed_var("CACHE_STALE_HOURS", 6),
            cache_ttl_days: parsed_var("CACHE_TTL_DAYS", 30),
            raw_cache_ttl_secs: parsed_var("RAW_CACHE_TTL_SECS", 600),
        };

        if config.concurrency_limit == 0 {
            return Err(Error::Config("CONCURRENCY_LIMIT must be at least 1".to_string()));
        }
        if config.cache_stale_hours <= 0 || config.cache_ttl_days <= 0 {
            return Err(Error::Config("cache windows must be positive".to_string()));
        }

        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
    pub include_forks: bool,
    /// Shift applied to event timestamps before hour/weekday bucketing.
    pub timezone_offset_minutes: i32,
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 5,
            include_forks: true,
            timezone_offset_minutes: 0,
            show_progress: false,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
            include_forks: config.include_forks,
            timezone_offset_minutes: config.timezone_offset_minutes,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Application-level staleness window checked on every read.
    pub stale_after: Duration,
    /// Absolute expiry enforced by the store itself.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::hours(6),
            ttl: Duration::days(30),
        }
    }
}

impl From<&Config> for CacheConfig {
    fn from(config: &Config) -> Self {
        Self {
            stale_after: Duration::hours(config.cache_stale_hours),
            ttl: Duration::days(config.cache_ttl_days),
        }
    }
}
