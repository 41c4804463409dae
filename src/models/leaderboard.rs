use serde::{Deserialize, Serialize};

use super::insights::{Grade, Insights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u8,
    pub grade: Grade,
    pub total_stars: u64,
    pub public_repos: u32,
    pub followers: u32,
    pub domain: String,
    /// 1-based; `None` until the board is ranked.
    pub rank: Option<u32>,
}

impl LeaderboardEntry {
    pub fn from_insights(insights: &Insights) -> Self {
        Self {
            username: insights.user.login.clone(),
            score: insights.profile_score.score,
            grade: insights.profile_score.grade,
            total_stars: insights.total_stars,
            public_repos: insights.user.public_repos,
            followers: insights.user.followers,
            domain: insights.domain.domain.clone(),
            rank: None,
        }
    }
}
