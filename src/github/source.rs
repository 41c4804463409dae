use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::{CommitRecord, GitHubEvent, GitHubUser, RepoSummary};

/// Supplier of raw GitHub data. `refresh` asks the implementation to bypass
/// whatever raw-response caching it does.
#[async_trait]
pub trait GitHubSource: Send + Sync {
    async fn fetch_user(&self, username: &str, refresh: bool) -> Result<GitHubUser>;

    async fn fetch_user_repos(&self, username: &str, refresh: bool) -> Result<Vec<RepoSummary>>;

    /// Language name to byte count for one repository.
    async fn fetch_repo_languages(
        &self,
        owner: &str,
        repo: &str,
        refresh: bool,
    ) -> Result<HashMap<String, u64>>;

    async fn fetch_user_events(&self, username: &str, refresh: bool) -> Result<Vec<GitHubEvent>>;

    /// Recent commits authored by `username` across `repos`.
    async fn fetch_user_commits(
        &self,
        username: &str,
        repos: &[RepoSummary],
        refresh: bool,
    ) -> Result<Vec<CommitRecord>>;
}
