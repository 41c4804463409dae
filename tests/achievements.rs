mod common;

use std::sync::Arc;

use common::{at, repo, FakeSource};
use gitinsights::analysis::assign_ranks;
use gitinsights::cache::ManualClock;
use gitinsights::models::{AchievementMetrics, LeaderboardEntry};
use gitinsights::{AchievementEvaluator, InsightsPipeline, PipelineConfig};

fn ids(statuses: &[gitinsights::models::AchievementStatus]) -> Vec<&str> {
    statuses.iter().map(|s| s.id.as_str()).collect()
}

#[tokio::test]
async fn test_achievements_from_ranked_insights() {
    let now = at(2024, 6, 1, 0);
    let mut source = FakeSource::with_user("mona");
    source.add_repo(repo("mona", "site", 60), &[("JavaScript", 10)]);
    source.add_repo(repo("mona", "api", 45), &[("Go", 10)]);

    let insights = InsightsPipeline::new(Arc::new(source), PipelineConfig::default())
        .with_clock(Arc::new(ManualClock::new(now)))
        .assemble("mona", false)
        .await
        .unwrap();

    let mut board = vec![LeaderboardEntry::from_insights(&insights)];
    let mut leader = LeaderboardEntry::from_insights(&insights);
    leader.username = "hubot".to_string();
    leader.score = 100;
    board.push(leader);
    assign_ranks(&mut board);

    let own = board.iter().find(|e| e.username == "mona");
    assert_eq!(own.and_then(|e| e.rank), Some(2));

    let metrics = AchievementMetrics::derive(&insights, own, now);
    assert_eq!(metrics.total_stars, 105);
    assert_eq!(metrics.rank, Some(2));
    assert_eq!(metrics.language_count, 2);
    assert!(metrics.account_age > 5.0);

    let report = AchievementEvaluator::new().evaluate(&metrics);
    let unlocked = ids(&report.unlocked);
    assert!(unlocked.contains(&"first_star"));
    assert!(unlocked.contains(&"star_collector"));
    assert!(unlocked.contains(&"on_the_board"));
    assert!(unlocked.contains(&"top_10"));
    assert!(unlocked.contains(&"veteran"));
    assert!(!unlocked.contains(&"number_one"));

    assert_eq!(report.total, report.unlocked.len() + report.locked.len());
    assert_eq!(report.unlocked_count, report.unlocked.len());

    // number_one is secret and still locked, so it is masked.
    let number_one = report
        .locked
        .iter()
        .find(|s| s.id == "number_one")
        .unwrap();
    assert_eq!(number_one.name, "Secret Achievement");
    assert_eq!(number_one.progress, 50);
}

#[tokio::test]
async fn test_unranked_user_has_no_ranking_achievements() {
    let now = at(2024, 6, 1, 0);
    let source = FakeSource::with_user("mona");

    let insights = InsightsPipeline::new(Arc::new(source), PipelineConfig::default())
        .with_clock(Arc::new(ManualClock::new(now)))
        .assemble("mona", false)
        .await
        .unwrap();

    let metrics = AchievementMetrics::derive(&insights, None, now);
    assert_eq!(metrics.rank, None);
    assert_eq!(metrics.total_stars, 0);

    let report = AchievementEvaluator::new().evaluate(&metrics);
    let unlocked = ids(&report.unlocked);
    assert!(!unlocked.contains(&"on_the_board"));
    assert!(!unlocked.contains(&"first_star"));
}
