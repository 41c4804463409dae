use serde::{Deserialize, Serialize};

/// Entry from `GET /repos/{owner}/{repo}/commits`. Only the author date is
/// consumed, so everything else is optional and a bad date never fails the
/// whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub sha: String,
    #[serde(default)]
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitDetails {
    #[serde(default)]
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
    pub date: Option<String>,
}

impl CommitRecord {
    pub fn authored_at(&self) -> Option<&str> {
        self.commit.author.as_ref()?.date.as_deref()
    }
}

/// Entry from `GET /users/{username}/events/public`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub created_at: Option<String>,
    pub payload: Option<serde_json::Value>,
}

impl GitHubEvent {
    /// Push, pull request and issue events count as code activity.
    pub fn is_code_activity(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "PushEvent" | "PullRequestEvent" | "IssuesEvent"
        )
    }
}
