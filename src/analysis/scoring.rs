use chrono::{DateTime, Utc};

use crate::models::insights::{Grade, LanguageDistribution, ProfileScore, ScoreBreakdown};
use crate::models::user::{has_text, GitHubUser, RepoSummary};

/// Scoring policy. Each category's maxima add up to 100.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    // Profile completeness (20)
    pub name: f64,
    pub bio: f64,
    pub location: f64,
    pub company: f64,
    pub blog: f64,
    pub twitter: f64,

    // Repository quality (30)
    pub repo_count_points: f64,
    pub repo_count_target: f64,
    pub star_points: f64,
    /// `(minimum stars, points)`, highest first; below the last step the
    /// points scale linearly against `star_linear_base`.
    pub star_steps: [(u64, f64); 3],
    pub star_linear_base: f64,
    pub description_points: f64,
    pub description_target: f64,

    // Skills & diversity (25)
    pub language_points: f64,
    pub language_target: f64,
    pub topic_points: f64,
    pub topic_target: f64,

    // Community engagement (10)
    pub follower_points: f64,
    pub follower_steps: [(u64, f64); 3],
    pub follower_linear_base: f64,
    pub following_points: f64,
    pub following_target: f64,
    pub gist_points: f64,
    pub gist_target: f64,

    // Activity & consistency (15)
    pub age_points: f64,
    pub age_target_years: f64,
    pub repo_rate_points: f64,
    pub repo_rate_target: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name: 5.0,
            bio: 5.0,
            location: 3.0,
            company: 3.0,
            blog: 2.0,
            twitter: 2.0,

            repo_count_points: 10.0,
            repo_count_target: 10.0,
            star_points: 10.0,
            star_steps: [(100, 10.0), (50, 7.0), (10, 5.0)],
            star_linear_base: 100.0,
            description_points: 10.0,
            description_target: 5.0,

            language_points: 13.0,
            language_target: 5.0,
            topic_points: 12.0,
            topic_target: 10.0,

            follower_points: 5.0,
            follower_steps: [(100, 5.0), (50, 4.0), (10, 2.0)],
            follower_linear_base: 100.0,
            following_points: 3.0,
            following_target: 20.0,
            gist_points: 2.0,
            gist_target: 5.0,

            age_points: 5.0,
            age_target_years: 2.0,
            repo_rate_points: 10.0,
            repo_rate_target: 5.0,
        }
    }
}

/// The parts of an insights aggregate the score depends on.
pub struct ScoreInput<'a> {
    pub user: &'a GitHubUser,
    pub repos_count: u32,
    pub languages: &'a LanguageDistribution,
    pub top_starred: &'a [RepoSummary],
    pub topics: &'a [(String, u32)],
}

fn linear(value: f64, target: f64, points: f64) -> f64 {
    value.min(target) / target * points
}

fn stepped(value: u64, steps: &[(u64, f64)], linear_base: f64, points: f64) -> f64 {
    steps
        .iter()
        .find(|(minimum, _)| value >= *minimum)
        .map(|(_, awarded)| *awarded)
        .unwrap_or_else(|| value as f64 / linear_base * points)
}

pub struct ProfileScorer {
    weights: ScoreWeights,
}

impl ProfileScorer {
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, input: &ScoreInput<'_>, now: DateTime<Utc>) -> ProfileScore {
        let breakdown = ScoreBreakdown {
            profile_completeness: self.profile_completeness(input.user),
            repository_quality: self.repository_quality(input),
            skills_diversity: self.skills_diversity(input),
            community_engagement: self.community_engagement(input.user),
            activity_consistency: self.activity_consistency(input, now),
        };

        let score = breakdown.total().round().clamp(0.0, 100.0) as u8;

        ProfileScore {
            score,
            grade: Grade::from_score(score),
            breakdown,
        }
    }

    fn profile_completeness(&self, user: &GitHubUser) -> f64 {
        let w = &self.weights;
        [
            (&user.name, w.name),
            (&user.bio, w.bio),
            (&user.location, w.location),
            (&user.company, w.company),
            (&user.blog, w.blog),
            (&user.twitter_username, w.twitter),
        ]
        .iter()
        .filter(|(field, _)| has_text(field))
        .map(|(_, points)| points)
        .sum()
    }

    fn repository_quality(&self, input: &ScoreInput<'_>) -> f64 {
        let w = &self.weights;

        let count = linear(input.repos_count as f64, w.repo_count_target, w.repo_count_points);

        let stars: u64 = input
            .top_starred
            .iter()
            .map(|r| r.stargazers_count as u64)
            .sum();
        let stars = stepped(stars, &w.star_steps, w.star_linear_base, w.star_points);

        let described = input
            .top_starred
            .iter()
            .filter(|r| has_text(&r.description))
            .count();
        let descriptions = linear(described as f64, w.description_target, w.description_points);

        count + stars + descriptions
    }

    fn skills_diversity(&self, input: &ScoreInput<'_>) -> f64 {
        let w = &self.weights;
        linear(
            input.languages.language_count() as f64,
            w.language_target,
            w.language_points,
        ) + linear(input.topics.len() as f64, w.topic_target, w.topic_points)
    }

    fn community_engagement(&self, user: &GitHubUser) -> f64 {
        let w = &self.weights;
        stepped(
            user.followers as u64,
            &w.follower_steps,
            w.follower_linear_base,
            w.follower_points,
        ) + linear(user.following as f64, w.following_target, w.following_points)
            + linear(user.public_gists as f64, w.gist_target, w.gist_points)
    }

    fn activity_consistency(&self, input: &ScoreInput<'_>, now: DateTime<Utc>) -> f64 {
        let w = &self.weights;
        let age = input.user.account_age_years(now);
        let repos_per_year = if age > 0.0 {
            input.repos_count as f64 / age
        } else {
            0.0
        };

        linear(age, w.age_target_years, w.age_points)
            + linear(repos_per_year, w.repo_rate_target, w.repo_rate_points)
    }
}

impl Default for ProfileScorer {
    fn default() -> Self {
        Self::new()
    }
}
