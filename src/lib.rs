pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod taxonomy;
pub mod analysis;
pub mod cache;
pub mod storage;

pub use config::{CacheConfig, Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, GitHubSource};
pub use analysis::{AchievementEvaluator, InsightsPipeline};
pub use cache::{CacheStore, MemoryStore, WidgetCache};
pub use storage::SqliteStore;
