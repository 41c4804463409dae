use async_trait::async_trait;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::analysis::activity::{active_days, hour_distribution, weekly_activity};
use crate::analysis::domain::DomainClassifier;
use crate::analysis::languages::{aggregate_languages, RepoLanguages};
use crate::analysis::ranking::{most_active, most_starred};
use crate::analysis::scoring::{ProfileScorer, ScoreInput};
use crate::analysis::topics::topic_frequency;
use crate::cache::{Clock, InsightsGenerator, SystemClock};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::github::GitHubSource;
use crate::models::{CommitRecord, GitHubEvent, GitHubUser, Insights, RepoSummary};

pub const TOP_REPOS: usize = 3;
pub const TOP_TOPICS: usize = 20;
/// Topics fed to the domain classifier.
pub const DOMAIN_TOPICS: usize = 10;

/// Everything one pipeline run fetched for a user.
#[derive(Debug, Clone)]
pub struct RawProfile {
    pub user: GitHubUser,
    pub repos: Vec<RepoSummary>,
    pub languages: RepoLanguages,
    pub events: Vec<GitHubEvent>,
    pub commits: Vec<CommitRecord>,
}

pub struct InsightsPipeline {
    source: Arc<dyn GitHubSource>,
    domain_classifier: DomainClassifier,
    scorer: ProfileScorer,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
}

impl InsightsPipeline {
    pub fn new(source: Arc<dyn GitHubSource>, config: PipelineConfig) -> Self {
        Self {
            source,
            domain_classifier: DomainClassifier::new(),
            scorer: ProfileScorer::new(),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_scorer(mut self, scorer: ProfileScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_domain_classifier(mut self, classifier: DomainClassifier) -> Self {
        self.domain_classifier = classifier;
        self
    }

    /// Fetches every raw input for `username` and assembles the aggregate.
    /// Holds no state between calls; caching belongs to the caller.
    pub async fn assemble(&self, username: &str, refresh: bool) -> Result<Insights> {
        let raw = self.fetch(username, refresh).await?;
        Ok(self.build(&raw))
    }

    pub async fn fetch(&self, username: &str, refresh: bool) -> Result<RawProfile> {
        tracing::info!("Fetching GitHub data for: {}", username);
        let (user, repos, events) = tokio::try_join!(
            self.source.fetch_user(username, refresh),
            self.source.fetch_user_repos(username, refresh),
            self.source.fetch_user_events(username, refresh),
        )?;

        let repos: Vec<RepoSummary> = repos
            .into_iter()
            .filter(|r| self.config.include_forks || !r.fork)
            .collect();
        tracing::info!("Found {} repositories to analyze", repos.len());

        let (languages, commits) = tokio::join!(
            self.fetch_all_languages(&repos, refresh),
            self.source.fetch_user_commits(username, &repos, refresh),
        );
        let commits = commits?;
        tracing::info!(
            "Fetched {} events and {} commits",
            events.len(),
            commits.len()
        );

        Ok(RawProfile {
            user,
            repos,
            languages,
            events,
            commits,
        })
    }

    /// Pure assembly from already-fetched data. The profile score is computed
    /// last because it reads most of the other fields.
    pub fn build(&self, raw: &RawProfile) -> Insights {
        let now = self.clock.now();

        let languages = aggregate_languages(&raw.repos, &raw.languages);
        let mut topics = topic_frequency(&raw.repos);
        topics.truncate(TOP_TOPICS);

        let top_starred = most_starred(&raw.repos, TOP_REPOS);
        let top_active = most_active(&raw.repos, TOP_REPOS);

        let commit_times = hour_distribution(&raw.events, self.config.timezone_offset_minutes);
        let weekly = weekly_activity(&raw.events, &raw.commits);
        let active_days = active_days(&raw.events, &raw.commits);

        let domain_topics = &topics[..topics.len().min(DOMAIN_TOPICS)];
        let domain = self
            .domain_classifier
            .classify(&languages.percentages, domain_topics);

        let repos_count = raw.repos.len() as u32;
        let total_stars = raw.repos.iter().map(|r| r.stargazers_count as u64).sum();

        let profile_score = self.scorer.score(
            &ScoreInput {
                user: &raw.user,
                repos_count,
                languages: &languages,
                top_starred: &top_starred,
                topics: &topics,
            },
            now,
        );

        tracing::debug!(
            "Assembled insights for {}: domain {}, score {}",
            raw.user.login,
            domain.domain,
            profile_score.score
        );

        Insights {
            user: raw.user.clone(),
            repos_count,
            total_stars,
            languages,
            topics,
            top_starred,
            top_active,
            commit_times,
            weekly,
            active_days,
            domain,
            profile_score,
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::with_draw_target(Some(len as u64), ProgressDrawTarget::stderr());
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::debug!("Progress template rejected: {}", e),
        }
        pb
    }

    /// Fetches per-repository language bytes with bounded concurrency. A
    /// repository whose fetch fails contributes no languages.
    async fn fetch_all_languages(&self, repos: &[RepoSummary], refresh: bool) -> RepoLanguages {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));
        let pb = self.progress_bar(repos.len());

        let mut language_futures = Vec::new();

        for repo in repos {
            let source = self.source.clone();
            let sem = semaphore.clone();
            let owner = repo.owner.login.clone();
            let name = repo.name.clone();
            let pb_clone = pb.clone();

            language_futures.push(async move {
                let languages = match sem.acquire().await {
                    Ok(_permit) => source.fetch_repo_languages(&owner, &name, refresh).await,
                    Err(e) => Err(Error::GitHubApi(e.to_string())),
                };

                pb_clone.inc(1);
                let languages = languages.unwrap_or_else(|e| {
                    tracing::warn!("Skipping languages for {}/{}: {}", owner, name, e);
                    HashMap::new()
                });
                (format!("{}/{}", owner, name), languages)
            });
        }

        let results = join_all(language_futures).await;
        pb.finish_and_clear();

        results.into_iter().collect()
    }
}

#[async_trait]
impl InsightsGenerator for InsightsPipeline {
    async fn generate(&self, username: &str, refresh: bool) -> Result<Insights> {
        self.assemble(username, refresh).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::models::{Grade, RepositoryOwner, GENERALIST};
    use chrono::{TimeZone, Utc};

    struct NoSource;

    #[async_trait]
    impl GitHubSource for NoSource {
        async fn fetch_user(&self, username: &str, _: bool) -> Result<GitHubUser> {
            Err(crate::error::Error::UserNotFound(username.to_string()))
        }
        async fn fetch_user_repos(&self, _: &str, _: bool) -> Result<Vec<RepoSummary>> {
            Ok(vec![])
        }
        async fn fetch_repo_languages(
            &self,
            _: &str,
            _: &str,
            _: bool,
        ) -> Result<HashMap<String, u64>> {
            Ok(HashMap::new())
        }
        async fn fetch_user_events(&self, _: &str, _: bool) -> Result<Vec<GitHubEvent>> {
            Ok(vec![])
        }
        async fn fetch_user_commits(
            &self,
            _: &str,
            _: &[RepoSummary],
            _: bool,
        ) -> Result<Vec<CommitRecord>> {
            Ok(vec![])
        }
    }

    fn pipeline() -> InsightsPipeline {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        InsightsPipeline::new(Arc::new(NoSource), PipelineConfig::default())
            .with_clock(Arc::new(ManualClock::new(now)))
    }

    fn bare_user() -> GitHubUser {
        GitHubUser {
            login: "newbie".to_string(),
            id: 1,
            name: None,
            avatar_url: String::new(),
            bio: None,
            company: None,
            location: None,
            blog: None,
            twitter_username: None,
            public_repos: 0,
            public_gists: 0,
            followers: 0,
            following: 0,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn repo(name: &str, stars: u32, topics: &[&str]) -> RepoSummary {
        RepoSummary {
            owner: RepositoryOwner {
                login: "newbie".to_string(),
            },
            name: name.to_string(),
            stargazers_count: stars,
            forks_count: 0,
            open_issues_count: 0,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            description: None,
            language: None,
            fork: false,
            pushed_at: None,
        }
    }

    #[test]
    fn test_build_empty_profile() {
        let raw = RawProfile {
            user: bare_user(),
            repos: vec![],
            languages: RepoLanguages::new(),
            events: vec![],
            commits: vec![],
        };

        let insights = pipeline().build(&raw);

        assert_eq!(insights.repos_count, 0);
        assert_eq!(insights.total_stars, 0);
        assert!(insights.languages.percentages.is_empty());
        assert!(insights.top_starred.is_empty());
        assert!(insights.weekly.is_empty());
        assert_eq!(insights.domain.domain, GENERALIST);
        assert_eq!(insights.profile_score.score, 0);
        assert_eq!(insights.profile_score.grade, Grade::F);
    }

    #[test]
    fn test_build_bounds_top_lists() {
        let topics: Vec<String> = (0..30).map(|i| format!("topic-{:02}", i)).collect();
        let topic_refs: Vec<&str> = topics.iter().map(|t| t.as_str()).collect();
        let repos: Vec<RepoSummary> = (0..8)
            .map(|i| repo(&format!("repo-{}", i), i, &topic_refs))
            .collect();

        let raw = RawProfile {
            user: bare_user(),
            repos,
            languages: RepoLanguages::new(),
            events: vec![],
            commits: vec![],
        };

        let insights = pipeline().build(&raw);

        assert_eq!(insights.top_starred.len(), TOP_REPOS);
        assert_eq!(insights.top_active.len(), TOP_REPOS);
        assert_eq!(insights.topics.len(), TOP_TOPICS);
        assert_eq!(insights.top_starred[0].name, "repo-7");
        assert_eq!(insights.total_stars, (0..8).sum::<u64>());
        assert_eq!(insights.repos_count, 8);
    }

    #[tokio::test]
    async fn test_assemble_propagates_user_fetch_failure() {
        let result = pipeline().assemble("ghost", false).await;
        assert!(matches!(result, Err(crate::error::Error::UserNotFound(_))));
    }
}
