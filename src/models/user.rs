use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub public_gists: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

impl GitHubUser {
    /// Account age in fractional years at `now`, never negative.
    pub fn account_age_years(&self, now: DateTime<Utc>) -> f64 {
        let seconds = (now - self.created_at).num_seconds().max(0) as f64;
        seconds / (365.25 * 86_400.0)
    }
}

/// Presence check used by profile completeness and repository
/// descriptions: GitHub reports unset fields as either `null` or `""`.
/// Whitespace-only values count as unset.
pub fn has_text(field: &Option<String>) -> bool {
    field.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub owner: RepositoryOwner,
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl RepoSummary {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}
