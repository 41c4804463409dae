use chrono::{DateTime, Utc};

use crate::models::achievement::{
    Achievement, AchievementMetrics, AchievementReport, AchievementStatus,
};
use crate::models::insights::Insights;
use crate::models::leaderboard::LeaderboardEntry;
use crate::taxonomy::achievement_catalog;

const SECRET_NAME: &str = "Secret Achievement";
const SECRET_DESCRIPTION: &str = "Keep coding to reveal this achievement.";

impl AchievementMetrics {
    /// Builds the evaluation snapshot from current insights and, when the
    /// user is on the leaderboard, their entry.
    pub fn derive(
        insights: &Insights,
        leaderboard: Option<&LeaderboardEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let activity = &insights.commit_times;
        Self {
            score: insights.profile_score.score,
            grade: insights.profile_score.grade,
            total_stars: leaderboard
                .map(|entry| entry.total_stars)
                .unwrap_or(insights.total_stars),
            public_repos: insights.user.public_repos,
            followers: insights.user.followers,
            rank: leaderboard.and_then(|entry| entry.rank),
            language_count: insights.languages.language_count(),
            weekend_activity: activity.weekend_total(),
            night_activity: activity.night_total(),
            morning_activity: activity.early_total(),
            active_days: insights.active_days,
            account_age: insights.user.account_age_years(now),
        }
    }
}

/// Evaluates the catalog against a metrics snapshot. Holds no state beyond
/// the catalog, so identical metrics always produce identical reports.
pub struct AchievementEvaluator {
    catalog: Vec<Achievement>,
}

impl AchievementEvaluator {
    pub fn new() -> Self {
        Self::with_catalog(achievement_catalog())
    }

    pub fn with_catalog(catalog: Vec<Achievement>) -> Self {
        Self { catalog }
    }

    pub fn evaluate(&self, metrics: &AchievementMetrics) -> AchievementReport {
        let (mut unlocked, mut locked): (Vec<_>, Vec<_>) = self
            .catalog
            .iter()
            .map(|achievement| self.status(achievement, metrics))
            .partition(|status| status.unlocked);

        unlocked.sort_by(|a, b| b.tier.cmp(&a.tier));
        locked.sort_by(|a, b| b.progress.cmp(&a.progress));

        let total = self.catalog.len();
        let unlocked_count = unlocked.len();
        let completion_percentage = if total == 0 {
            0
        } else {
            (unlocked_count as f64 / total as f64 * 100.0).round() as u8
        };

        AchievementReport {
            unlocked,
            locked,
            total,
            unlocked_count,
            completion_percentage,
        }
    }

    fn status(&self, achievement: &Achievement, metrics: &AchievementMetrics) -> AchievementStatus {
        let unlocked = (achievement.condition)(metrics);
        let progress = if unlocked {
            100
        } else {
            let raw = (achievement.progress)(metrics);
            if raw.is_finite() {
                raw.clamp(0.0, 100.0).round() as u8
            } else {
                0
            }
        };

        let (name, description) = if achievement.secret && !unlocked {
            (SECRET_NAME, SECRET_DESCRIPTION)
        } else {
            (achievement.name, achievement.description)
        };

        AchievementStatus {
            id: achievement.id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: achievement.category,
            tier: achievement.tier,
            secret: achievement.secret,
            unlocked,
            progress,
        }
    }
}

impl Default for AchievementEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::achievement::{AchievementCategory, Tier};
    use crate::models::insights::Grade;

    fn metrics() -> AchievementMetrics {
        AchievementMetrics {
            score: 72,
            grade: Grade::B,
            total_stars: 150,
            public_repos: 12,
            followers: 40,
            rank: Some(42),
            language_count: 6,
            weekend_activity: 3,
            night_activity: 10,
            morning_activity: 60,
            active_days: 15,
            account_age: 6.5,
        }
    }

    #[test]
    fn test_unlocks_and_progress() {
        let report = AchievementEvaluator::new().evaluate(&metrics());
        let unlocked: Vec<_> = report.unlocked.iter().map(|s| s.id.as_str()).collect();

        for id in [
            "rising_star",
            "solid_profile",
            "first_star",
            "star_collector",
            "builder",
            "networker",
            "on_the_board",
            "top_100",
            "polyglot",
            "early_bird",
            "veteran",
        ] {
            assert!(unlocked.contains(&id), "{} should be unlocked", id);
        }
        assert!(report.unlocked.iter().all(|s| s.progress == 100));

        let influencer = report.locked.iter().find(|s| s.id == "influencer").unwrap();
        assert_eq!(influencer.progress, 40);
        let top_10 = report.locked.iter().find(|s| s.id == "top_10").unwrap();
        assert_eq!(top_10.progress, 24);

        assert_eq!(report.total, report.unlocked.len() + report.locked.len());
        assert_eq!(report.unlocked_count, report.unlocked.len());
    }

    #[test]
    fn test_sort_orders() {
        let report = AchievementEvaluator::new().evaluate(&metrics());
        assert!(report.unlocked.windows(2).all(|w| w[0].tier >= w[1].tier));
        assert!(report.locked.windows(2).all(|w| w[0].progress >= w[1].progress));
    }

    #[test]
    fn test_locked_secrets_are_masked() {
        let report = AchievementEvaluator::new().evaluate(&metrics());
        let number_one = report.locked.iter().find(|s| s.id == "number_one").unwrap();
        assert!(number_one.secret);
        assert_eq!(number_one.name, SECRET_NAME);
        assert_eq!(number_one.description, SECRET_DESCRIPTION);

        let champion = AchievementMetrics {
            rank: Some(1),
            ..metrics()
        };
        let report = AchievementEvaluator::new().evaluate(&champion);
        let number_one = report.unlocked.iter().find(|s| s.id == "number_one").unwrap();
        assert_eq!(number_one.name, "Number One");
        assert_eq!(report.unlocked[0].tier, Tier::Legendary);
    }

    #[test]
    fn test_evaluation_is_pure() {
        let evaluator = AchievementEvaluator::new();
        let first = serde_json::to_string(&evaluator.evaluate(&metrics())).unwrap();
        let second = serde_json::to_string(&evaluator.evaluate(&metrics())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_completion_percentage_and_clamping() {
        let catalog = vec![
            Achievement {
                id: "always",
                name: "Always",
                description: "",
                category: AchievementCategory::Special,
                tier: Tier::Bronze,
                condition: |_| true,
                progress: |_| 0.0,
                secret: false,
            },
            Achievement {
                id: "overshoot",
                name: "Overshoot",
                description: "",
                category: AchievementCategory::Special,
                tier: Tier::Gold,
                condition: |_| false,
                progress: |_| 250.0,
                secret: false,
            },
            Achievement {
                id: "negative",
                name: "Negative",
                description: "",
                category: AchievementCategory::Special,
                tier: Tier::Gold,
                condition: |_| false,
                progress: |_| -5.0,
                secret: false,
            },
        ];

        let report = AchievementEvaluator::with_catalog(catalog).evaluate(&metrics());
        assert_eq!(report.unlocked_count, 1);
        assert_eq!(report.completion_percentage, 33);
        assert_eq!(report.locked[0].progress, 100);
        assert_eq!(report.locked[1].progress, 0);

        let empty = AchievementEvaluator::with_catalog(Vec::new()).evaluate(&metrics());
        assert_eq!(empty.completion_percentage, 0);
    }
}
