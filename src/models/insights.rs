use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::user::{GitHubUser, RepoSummary};

pub const GENERALIST: &str = "Generalist";

/// The per-user analytics aggregate. Always regenerated and replaced as a
/// whole; nothing patches individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub user: GitHubUser,
    pub repos_count: u32,
    pub total_stars: u64,
    pub languages: LanguageDistribution,
    pub topics: Vec<(String, u32)>,
    pub top_starred: Vec<RepoSummary>,
    pub top_active: Vec<RepoSummary>,
    pub commit_times: ActivityProfile,
    pub weekly: WeeklyActivity,
    pub active_days: u32,
    pub domain: DomainScore,
    pub profile_score: ProfileScore,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageDistribution {
    pub totals: BTreeMap<String, u64>,
    /// Descending by byte count, rounded to one decimal.
    pub percentages: Vec<(String, f64)>,
    pub top3: Vec<(String, f64)>,
}

impl LanguageDistribution {
    pub fn language_count(&self) -> usize {
        self.percentages.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodingProfile {
    #[serde(rename = "night-coder")]
    NightCoder,
    #[serde(rename = "early-bird")]
    EarlyBird,
}

impl CodingProfile {
    /// 20:00 through 04:59.
    pub fn is_night_hour(hour: usize) -> bool {
        hour >= 20 || hour < 5
    }

    /// 05:00 through 11:59.
    pub fn is_early_hour(hour: usize) -> bool {
        (5..12).contains(&hour)
    }
}

impl std::fmt::Display for CodingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodingProfile::NightCoder => write!(f, "night-coder"),
            CodingProfile::EarlyBird => write!(f, "early-bird"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityProfile {
    pub hours: [u32; 24],
    /// Sunday first.
    pub weekdays: [u32; 7],
    pub profile: CodingProfile,
}

impl Default for ActivityProfile {
    fn default() -> Self {
        Self {
            hours: [0; 24],
            weekdays: [0; 7],
            profile: CodingProfile::EarlyBird,
        }
    }
}

impl ActivityProfile {
    pub fn night_total(&self) -> u32 {
        self.hours
            .iter()
            .enumerate()
            .filter(|(hour, _)| CodingProfile::is_night_hour(*hour))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn early_total(&self) -> u32 {
        self.hours
            .iter()
            .enumerate()
            .filter(|(hour, _)| CodingProfile::is_early_hour(*hour))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn weekend_total(&self) -> u32 {
        self.weekdays[0] + self.weekdays[6]
    }

    pub fn total(&self) -> u32 {
        self.hours.iter().sum()
    }
}

/// `(week key, count)` pairs, newest week first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyActivity(pub Vec<(String, u32)>);

impl WeeklyActivity {
    pub fn recent(&self, weeks: usize) -> &[(String, u32)] {
        &self.0[..weeks.min(self.0.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    pub scores: BTreeMap<String, f64>,
}

impl Default for DomainScore {
    fn default() -> Self {
        Self {
            domain: GENERALIST.to_string(),
            scores: BTreeMap::new(),
        }
    }
}

impl DomainScore {
    pub fn is_generalist(&self) -> bool {
        self.domain == GENERALIST
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

const GRADE_LADDER: [(u8, Grade); 12] = [
    (90, Grade::APlus),
    (85, Grade::A),
    (80, Grade::AMinus),
    (75, Grade::BPlus),
    (70, Grade::B),
    (65, Grade::BMinus),
    (60, Grade::CPlus),
    (55, Grade::C),
    (50, Grade::CMinus),
    (45, Grade::DPlus),
    (40, Grade::D),
    (35, Grade::DMinus),
];

impl Grade {
    pub fn from_score(score: u8) -> Self {
        GRADE_LADDER
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub profile_completeness: f64,
    pub repository_quality: f64,
    pub skills_diversity: f64,
    pub community_engagement: f64,
    pub activity_consistency: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.profile_completeness
            + self.repository_quality
            + self.skills_diversity
            + self.community_engagement
            + self.activity_consistency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub score: u8,
    pub grade: Grade,
    pub breakdown: ScoreBreakdown,
}
