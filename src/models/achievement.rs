use serde::{Deserialize, Serialize};

use super::insights::Grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Legendary,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Bronze => write!(f, "Bronze"),
            Tier::Silver => write!(f, "Silver"),
            Tier::Gold => write!(f, "Gold"),
            Tier::Platinum => write!(f, "Platinum"),
            Tier::Diamond => write!(f, "Diamond"),
            Tier::Legendary => write!(f, "Legendary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementCategory {
    Score,
    Stars,
    Repositories,
    Community,
    Ranking,
    Languages,
    Activity,
    Special,
}

impl std::fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AchievementCategory::Score => write!(f, "Score"),
            AchievementCategory::Stars => write!(f, "Stars"),
            AchievementCategory::Repositories => write!(f, "Repositories"),
            AchievementCategory::Community => write!(f, "Community"),
            AchievementCategory::Ranking => write!(f, "Ranking"),
            AchievementCategory::Languages => write!(f, "Languages"),
            AchievementCategory::Activity => write!(f, "Activity"),
            AchievementCategory::Special => write!(f, "Special"),
        }
    }
}

/// Snapshot every achievement predicate is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementMetrics {
    pub score: u8,
    pub grade: Grade,
    pub total_stars: u64,
    pub public_repos: u32,
    pub followers: u32,
    pub rank: Option<u32>,
    pub language_count: usize,
    pub weekend_activity: u32,
    pub night_activity: u32,
    pub morning_activity: u32,
    pub active_days: u32,
    /// Years.
    pub account_age: f64,
}

/// Static catalog entry. Unlock state is never stored; it is recomputed from
/// the current metrics on every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub tier: Tier,
    pub condition: fn(&AchievementMetrics) -> bool,
    /// Raw percentage toward the threshold; clamped by the evaluator.
    pub progress: fn(&AchievementMetrics) -> f64,
    pub secret: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub tier: Tier,
    pub secret: bool,
    pub unlocked: bool,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementReport {
    /// Highest tier first.
    pub unlocked: Vec<AchievementStatus>,
    /// Closest to unlocking first.
    pub locked: Vec<AchievementStatus>,
    pub total: usize,
    pub unlocked_count: usize,
    pub completion_percentage: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Bronze < Tier::Silver);
        assert!(Tier::Silver < Tier::Gold);
        assert!(Tier::Gold < Tier::Platinum);
        assert!(Tier::Platinum < Tier::Diamond);
        assert!(Tier::Diamond < Tier::Legendary);
    }
}
