#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use gitinsights::error::{Error, Result};
use gitinsights::github::GitHubSource;
use gitinsights::models::{
    CommitAuthor, CommitDetails, CommitRecord, GitHubEvent, GitHubUser, RepoSummary,
    RepositoryOwner,
};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn user(login: &str) -> GitHubUser {
    GitHubUser {
        login: login.to_string(),
        id: 42,
        name: Some("Mona Lisa".to_string()),
        avatar_url: String::new(),
        bio: Some("Builds things".to_string()),
        company: None,
        location: Some("Lisbon".to_string()),
        blog: None,
        twitter_username: None,
        public_repos: 2,
        public_gists: 0,
        followers: 12,
        following: 3,
        created_at: at(2019, 1, 1, 0),
    }
}

pub fn repo(owner: &str, name: &str, stars: u32) -> RepoSummary {
    RepoSummary {
        owner: RepositoryOwner {
            login: owner.to_string(),
        },
        name: name.to_string(),
        stargazers_count: stars,
        forks_count: 0,
        open_issues_count: 0,
        topics: Vec::new(),
        description: None,
        language: None,
        fork: false,
        pushed_at: None,
    }
}

pub fn event(kind: &str, created_at: &str) -> GitHubEvent {
    GitHubEvent {
        kind: kind.to_string(),
        created_at: Some(created_at.to_string()),
        payload: None,
    }
}

pub fn commit(date: &str) -> CommitRecord {
    CommitRecord {
        sha: "abc1234".to_string(),
        commit: CommitDetails {
            message: "work".to_string(),
            author: Some(CommitAuthor {
                name: "Mona".to_string(),
                date: Some(date.to_string()),
            }),
        },
    }
}

/// In-memory GitHub with per-call counters and switchable failures.
#[derive(Default)]
pub struct FakeSource {
    pub users: HashMap<String, GitHubUser>,
    pub repos: Vec<RepoSummary>,
    pub languages: HashMap<String, HashMap<String, u64>>,
    pub failing_languages: HashSet<String>,
    pub events: Vec<GitHubEvent>,
    pub commits: Vec<CommitRecord>,
    pub fail_repos: bool,
    pub user_calls: AtomicUsize,
    pub language_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_user(login: &str) -> Self {
        let mut source = Self::default();
        source.users.insert(login.to_lowercase(), user(login));
        source
    }

    pub fn add_repo(&mut self, repo: RepoSummary, languages: &[(&str, u64)]) {
        self.languages.insert(
            repo.full_name(),
            languages
                .iter()
                .map(|(language, bytes)| (language.to_string(), *bytes))
                .collect(),
        );
        self.repos.push(repo);
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitHubSource for FakeSource {
    async fn fetch_user(&self, username: &str, _refresh: bool) -> Result<GitHubUser> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(&username.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    async fn fetch_user_repos(&self, _username: &str, _refresh: bool) -> Result<Vec<RepoSummary>> {
        if self.fail_repos {
            return Err(Error::GitHubApi("500 Internal Server Error".to_string()));
        }
        Ok(self.repos.clone())
    }

    async fn fetch_repo_languages(
        &self,
        owner: &str,
        repo: &str,
        _refresh: bool,
    ) -> Result<HashMap<String, u64>> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        let key = format!("{}/{}", owner, repo);
        if self.failing_languages.contains(&key) {
            return Err(Error::GitHubApi(format!("languages for {} unavailable", key)));
        }
        Ok(self.languages.get(&key).cloned().unwrap_or_default())
    }

    async fn fetch_user_events(&self, _username: &str, _refresh: bool) -> Result<Vec<GitHubEvent>> {
        Ok(self.events.clone())
    }

    async fn fetch_user_commits(
        &self,
        _username: &str,
        _repos: &[RepoSummary],
        _refresh: bool,
    ) -> Result<Vec<CommitRecord>> {
        Ok(self.commits.clone())
    }
}
