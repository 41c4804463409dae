use crate::models::achievement::{Achievement, AchievementCategory, AchievementMetrics, Tier};
use crate::models::insights::Grade;

fn ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 100.0;
    }
    value / target * 100.0
}

/// Progress toward a rank threshold; rank 1 is best, unranked is zero.
fn rank_progress(rank: Option<u32>, threshold: u32) -> f64 {
    match rank {
        Some(r) if r > 0 => ratio(threshold as f64, r as f64),
        _ => 0.0,
    }
}

fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    tier: Tier,
    condition: fn(&AchievementMetrics) -> bool,
    progress: fn(&AchievementMetrics) -> f64,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        category,
        tier,
        condition,
        progress,
        secret: false,
    }
}

fn secret(mut entry: Achievement) -> Achievement {
    entry.secret = true;
    entry
}

/// The full achievement catalog. IDs are stable across releases.
pub fn catalog() -> Vec<Achievement> {
    use AchievementCategory::*;

    vec![
        // Score
        achievement(
            "rising_star",
            "Rising Star",
            "Reach a profile score of 50.",
            Score,
            Tier::Bronze,
            |m| m.score >= 50,
            |m| ratio(m.score as f64, 50.0),
        ),
        achievement(
            "solid_profile",
            "Solid Profile",
            "Reach a profile score of 70.",
            Score,
            Tier::Silver,
            |m| m.score >= 70,
            |m| ratio(m.score as f64, 70.0),
        ),
        achievement(
            "elite_developer",
            "Elite Developer",
            "Reach a profile score of 85.",
            Score,
            Tier::Gold,
            |m| m.score >= 85,
            |m| ratio(m.score as f64, 85.0),
        ),
        achievement(
            "top_of_the_class",
            "Top of the Class",
            "Earn an A+ profile grade.",
            Score,
            Tier::Platinum,
            |m| m.grade == Grade::APlus,
            |m| ratio(m.score as f64, 90.0),
        ),
        // Stars
        achievement(
            "first_star",
            "First Star",
            "Receive your first star.",
            Stars,
            Tier::Bronze,
            |m| m.total_stars >= 1,
            |m| ratio(m.total_stars as f64, 1.0),
        ),
        achievement(
            "star_collector",
            "Star Collector",
            "Collect 100 stars across your repositories.",
            Stars,
            Tier::Silver,
            |m| m.total_stars >= 100,
            |m| ratio(m.total_stars as f64, 100.0),
        ),
        achievement(
            "star_magnet",
            "Star Magnet",
            "Collect 1,000 stars across your repositories.",
            Stars,
            Tier::Gold,
            |m| m.total_stars >= 1_000,
            |m| ratio(m.total_stars as f64, 1_000.0),
        ),
        achievement(
            "supernova",
            "Supernova",
            "Collect 10,000 stars across your repositories.",
            Stars,
            Tier::Diamond,
            |m| m.total_stars >= 10_000,
            |m| ratio(m.total_stars as f64, 10_000.0),
        ),
        // Repositories
        achievement(
            "builder",
            "Builder",
            "Publish 10 public repositories.",
            Repositories,
            Tier::Bronze,
            |m| m.public_repos >= 10,
            |m| ratio(m.public_repos as f64, 10.0),
        ),
        achievement(
            "prolific_builder",
            "Prolific Builder",
            "Publish 50 public repositories.",
            Repositories,
            Tier::Silver,
            |m| m.public_repos >= 50,
            |m| ratio(m.public_repos as f64, 50.0),
        ),
        achievement(
            "repo_factory",
            "Repo Factory",
            "Publish 100 public repositories.",
            Repositories,
            Tier::Gold,
            |m| m.public_repos >= 100,
            |m| ratio(m.public_repos as f64, 100.0),
        ),
        // Community
        achievement(
            "networker",
            "Networker",
            "Gain 10 followers.",
            Community,
            Tier::Bronze,
            |m| m.followers >= 10,
            |m| ratio(m.followers as f64, 10.0),
        ),
        achievement(
            "influencer",
            "Influencer",
            "Gain 100 followers.",
            Community,
            Tier::Silver,
            |m| m.followers >= 100,
            |m| ratio(m.followers as f64, 100.0),
        ),
        achievement(
            "thought_leader",
            "Thought Leader",
            "Gain 1,000 followers.",
            Community,
            Tier::Gold,
            |m| m.followers >= 1_000,
            |m| ratio(m.followers as f64, 1_000.0),
        ),
        achievement(
            "living_legend",
            "Living Legend",
            "Gain 10,000 followers.",
            Community,
            Tier::Legendary,
            |m| m.followers >= 10_000,
            |m| ratio(m.followers as f64, 10_000.0),
        ),
        // Ranking
        achievement(
            "on_the_board",
            "On the Board",
            "Appear on the leaderboard.",
            Ranking,
            Tier::Bronze,
            |m| m.rank.is_some(),
            |m| if m.rank.is_some() { 100.0 } else { 0.0 },
        ),
        achievement(
            "top_100",
            "Top 100",
            "Reach the top 100 of the leaderboard.",
            Ranking,
            Tier::Gold,
            |m| matches!(m.rank, Some(r) if r <= 100),
            |m| rank_progress(m.rank, 100),
        ),
        achievement(
            "top_10",
            "Top 10",
            "Reach the top 10 of the leaderboard.",
            Ranking,
            Tier::Diamond,
            |m| matches!(m.rank, Some(r) if r <= 10),
            |m| rank_progress(m.rank, 10),
        ),
        secret(achievement(
            "number_one",
            "Number One",
            "Hold the first place on the leaderboard.",
            Ranking,
            Tier::Legendary,
            |m| m.rank == Some(1),
            |m| rank_progress(m.rank, 1),
        )),
        // Languages
        achievement(
            "polyglot",
            "Polyglot",
            "Write code in 5 languages.",
            Languages,
            Tier::Silver,
            |m| m.language_count >= 5,
            |m| ratio(m.language_count as f64, 5.0),
        ),
        achievement(
            "language_master",
            "Language Master",
            "Write code in 10 languages.",
            Languages,
            Tier::Gold,
            |m| m.language_count >= 10,
            |m| ratio(m.language_count as f64, 10.0),
        ),
        // Activity
        achievement(
            "night_owl",
            "Night Owl",
            "Log 50 code events between 20:00 and 05:00.",
            Activity,
            Tier::Silver,
            |m| m.night_activity >= 50,
            |m| ratio(m.night_activity as f64, 50.0),
        ),
        achievement(
            "early_bird",
            "Early Bird",
            "Log 50 code events between 05:00 and noon.",
            Activity,
            Tier::Silver,
            |m| m.morning_activity >= 50,
            |m| ratio(m.morning_activity as f64, 50.0),
        ),
        secret(achievement(
            "weekend_warrior",
            "Weekend Warrior",
            "Log 30 code events on weekends.",
            Activity,
            Tier::Silver,
            |m| m.weekend_activity >= 30,
            |m| ratio(m.weekend_activity as f64, 30.0),
        )),
        achievement(
            "consistent_contributor",
            "Consistent Contributor",
            "Be active on 30 different days.",
            Activity,
            Tier::Gold,
            |m| m.active_days >= 30,
            |m| ratio(m.active_days as f64, 30.0),
        ),
        // Special
        achievement(
            "veteran",
            "Veteran",
            "Keep a GitHub account for 5 years.",
            Special,
            Tier::Gold,
            |m| m.account_age >= 5.0,
            |m| ratio(m.account_age, 5.0),
        ),
        secret(achievement(
            "old_guard",
            "Old Guard",
            "Keep a GitHub account for 10 years.",
            Special,
            Tier::Platinum,
            |m| m.account_age >= 10.0,
            |m| ratio(m.account_age, 10.0),
        )),
    ]
}
