use async_trait::async_trait;
use chrono::Duration;
use futures::future::join_all;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::paginator::{ensure_success, Paginator};
use crate::github::rate_limiter::RateLimiter;
use crate::github::source::GitHubSource;
use crate::models::{CommitRecord, GitHubEvent, GitHubUser, RepoSummary};

const DEFAULT_RAW_TTL_SECS: i64 = 600;
/// GitHub serves at most 300 public events per user.
const MAX_EVENTS: u32 = 300;

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    raw_cache: TtlCache<serde_json::Value>,
    base_url: String,
    max_commit_repos: usize,
    max_commits_per_repo: u32,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitinsights/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            raw_cache: TtlCache::new(
                Duration::seconds(DEFAULT_RAW_TTL_SECS),
                Arc::new(SystemClock),
            ),
            base_url: "https://api.github.com".to_string(),
            max_commit_repos: 5,
            max_commits_per_repo: 30,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.github_token)?
            .with_raw_cache(
                Duration::seconds(config.raw_cache_ttl_secs),
                Arc::new(SystemClock),
            )
            .with_commit_limits(config.max_commit_repos, config.max_commits_per_repo))
    }

    pub fn with_raw_cache(mut self, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        self.raw_cache = TtlCache::new(ttl, clock);
        self
    }

    pub fn with_commit_limits(mut self, max_repos: usize, max_per_repo: u32) -> Self {
        self.max_commit_repos = max_repos;
        self.max_commits_per_repo = max_per_repo;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Serves `key` from the raw response cache, or runs `fetch` and stores
    /// its result. `refresh` drops any memoised value first.
    async fn cached<T, F, Fut>(&self, key: &str, refresh: bool, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if refresh {
            self.raw_cache.invalidate(key).await;
        } else if let Some(value) = self.raw_cache.get(key).await {
            match serde_json::from_value(value) {
                Ok(hit) => {
                    tracing::debug!("Raw cache hit: {}", key);
                    return Ok(hit);
                }
                Err(e) => tracing::warn!("Discarding unreadable raw cache entry {}: {}", key, e),
            }
        }

        let fresh = fetch().await?;
        self.raw_cache.set(key, serde_json::to_value(&fresh)?).await;
        Ok(fresh)
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        self.rate_limiter.wait().await;
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response).await;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }

        let response = ensure_success(response, &format!("Failed to fetch user {}", username)).await?;
        Ok(response.json().await?)
    }

    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let url = format!(
            "{}/users/{}/repos?type=owner&sort=pushed",
            self.base_url, username
        );
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::info!("Fetching repositories for: {}", username);
        paginator.fetch_all(&url, 100).await
    }

    pub async fn get_user_events(&self, username: &str) -> Result<Vec<GitHubEvent>> {
        let url = format!("{}/users/{}/events/public", self.base_url, username);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::info!("Fetching public events for: {}", username);
        paginator.fetch_limited(&url, 100, MAX_EVENTS).await
    }

    pub async fn get_repo_commits(
        &self,
        owner: &str,
        repo: &str,
        author: Option<&str>,
        max_commits: u32,
    ) -> Result<Vec<CommitRecord>> {
        let mut url = format!("{}/repos/{}/{}/commits", self.base_url, owner, repo);
        if let Some(author) = author {
            url.push_str(&format!("?author={}", author));
        }

        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::debug!("Fetching commits for: {}/{}", owner, repo);
        paginator.fetch_limited(&url, 100, max_commits).await
    }

    pub async fn get_repo_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, u64>> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response).await;

        let response = ensure_success(
            response,
            &format!("Failed to fetch languages for {}/{}", owner, repo),
        )
        .await?;

        Ok(response.json().await?)
    }

    /// The `limit` most recently pushed repositories.
    fn commit_candidates(repos: &[RepoSummary], limit: usize) -> Vec<&RepoSummary> {
        let mut candidates: Vec<&RepoSummary> = repos.iter().collect();
        candidates.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
        candidates.truncate(limit);
        candidates
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[async_trait]
impl GitHubSource for GitHubClient {
    async fn fetch_user(&self, username: &str, refresh: bool) -> Result<GitHubUser> {
        let key = format!("user:{}", username.to_lowercase());
        self.cached(&key, refresh, || self.get_user(username)).await
    }

    async fn fetch_user_repos(&self, username: &str, refresh: bool) -> Result<Vec<RepoSummary>> {
        let key = format!("repos:{}", username.to_lowercase());
        self.cached(&key, refresh, || self.get_user_repos(username))
            .await
    }

    async fn fetch_repo_languages(
        &self,
        owner: &str,
        repo: &str,
        refresh: bool,
    ) -> Result<HashMap<String, u64>> {
        let key = format!("languages:{}/{}", owner.to_lowercase(), repo.to_lowercase());
        self.cached(&key, refresh, || self.get_repo_languages(owner, repo))
            .await
    }

    async fn fetch_user_events(&self, username: &str, refresh: bool) -> Result<Vec<GitHubEvent>> {
        let key = format!("events:{}", username.to_lowercase());
        self.cached(&key, refresh, || self.get_user_events(username))
            .await
    }

    async fn fetch_user_commits(
        &self,
        username: &str,
        repos: &[RepoSummary],
        refresh: bool,
    ) -> Result<Vec<CommitRecord>> {
        let candidates = Self::commit_candidates(repos, self.max_commit_repos);
        tracing::info!(
            "Fetching commits for {} from {} repositories",
            username,
            candidates.len()
        );

        let futures = candidates.into_iter().map(move |repo| {
            let key = format!(
                "commits:{}:{}",
                username.to_lowercase(),
                repo.full_name().to_lowercase()
            );
            async move {
                self.cached(&key, refresh, || {
                    self.get_repo_commits(
                        &repo.owner.login,
                        &repo.name,
                        Some(username),
                        self.max_commits_per_repo,
                    )
                })
                .await
            }
        });

        let mut commits = Vec::new();
        for result in join_all(futures).await {
            commits.extend(result?);
        }
        Ok(commits)
    }
}
