pub mod achievements;
pub mod activity;
pub mod domain;
pub mod languages;
pub mod leaderboard;
pub mod pipeline;
pub mod ranking;
pub mod scoring;
pub mod topics;

pub use achievements::AchievementEvaluator;
pub use domain::DomainClassifier;
pub use languages::{aggregate_languages, RepoLanguages};
pub use leaderboard::assign_ranks;
pub use pipeline::{InsightsPipeline, RawProfile};
pub use scoring::{ProfileScorer, ScoreInput, ScoreWeights};
