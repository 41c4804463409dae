use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gitinsights::analysis::assign_ranks;
use gitinsights::cache::{Clock, SystemClock};
use gitinsights::models::{
    AchievementMetrics, AchievementReport, AchievementStatus, Insights, LeaderboardEntry,
};
use gitinsights::{
    AchievementEvaluator, CacheConfig, Config, GitHubClient, InsightsPipeline, PipelineConfig,
    SqliteStore, WidgetCache,
};

#[derive(Parser, Debug)]
#[command(name = "gitinsights")]
#[command(version = "0.1.0")]
#[command(about = "Profile analytics, scoring and achievements for GitHub users")]
struct Args {
    /// GitHub username to analyze
    #[arg(short, long)]
    username: String,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Ignore cached insights and raw responses
    #[arg(long)]
    refresh: bool,

    /// Database path for the insights cache (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,

    /// Minutes east of UTC used for hour-of-day bucketing
    #[arg(long, allow_hyphen_values = true)]
    timezone_offset: Option<i32>,

    /// Leave forked repositories out of the analysis
    #[arg(long)]
    exclude_forks: bool,

    /// Evaluate and print achievements
    #[arg(long)]
    achievements: bool,

    /// Other users to rank against (comma separated)
    #[arg(long, value_delimiter = ',')]
    compare: Vec<String>,

    /// Number of recent weeks of activity to show
    #[arg(long, default_value = "12")]
    weeks: usize,

    /// Show a progress bar while fetching repository languages
    #[arg(long)]
    progress: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    insights: &'a Insights,
    #[serde(skip_serializing_if = "Option::is_none")]
    leaderboard: Option<&'a [LeaderboardEntry]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    achievements: Option<&'a AchievementReport>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitinsights=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    let cache_config = CacheConfig::from(&config);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let database = args.database.as_deref().unwrap_or(&config.database_path);
    let store = SqliteStore::open(database, cache_config.ttl, clock.clone())?;

    let github = GitHubClient::from_config(&config)?;

    let base = PipelineConfig::from(&config);
    let pipeline_config = PipelineConfig {
        include_forks: base.include_forks && !args.exclude_forks,
        timezone_offset_minutes: args
            .timezone_offset
            .unwrap_or(base.timezone_offset_minutes),
        show_progress: args.progress,
        ..base
    };

    let pipeline = InsightsPipeline::new(Arc::new(github), pipeline_config).with_clock(clock.clone());
    let cache = WidgetCache::new(
        Arc::new(store),
        Arc::new(pipeline),
        clock.clone(),
        &cache_config,
    );

    tracing::info!("Building insights for GitHub user: {}", args.username);
    let insights = cache.get_or_generate(&args.username, args.refresh).await?;

    let leaderboard = if args.compare.is_empty() {
        None
    } else {
        let mut entries = vec![LeaderboardEntry::from_insights(&insights)];
        for other in &args.compare {
            match cache.lookup(other.trim(), args.refresh).await {
                Some(theirs) => entries.push(LeaderboardEntry::from_insights(&theirs)),
                None => tracing::warn!("Leaving {} off the leaderboard", other),
            }
        }
        assign_ranks(&mut entries);
        Some(entries)
    };

    let achievements = if args.achievements {
        let own_entry = leaderboard.as_ref().and_then(|board| {
            board
                .iter()
                .find(|e| e.username.eq_ignore_ascii_case(&insights.user.login))
        });
        let metrics = AchievementMetrics::derive(&insights, own_entry, clock.now());
        Some(AchievementEvaluator::new().evaluate(&metrics))
    } else {
        None
    };

    let report = Report {
        insights: &insights,
        leaderboard: leaderboard.as_deref(),
        achievements: achievements.as_ref(),
    };
    output_report(&report, &args)?;

    Ok(())
}

fn output_report(report: &Report<'_>, args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(report)?,
        "markdown" => format_markdown(report, args.weeks),
        _ => format_text(report, args.weeks),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn peak_hour(insights: &Insights) -> Option<usize> {
    let hours = &insights.commit_times.hours;
    hours
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(hour, _)| hour)
}

fn status_line(status: &AchievementStatus) -> String {
    if status.unlocked {
        format!("[{}] {}: {}", status.tier, status.name, status.description)
    } else {
        format!(
            "[{}] {}: {} ({}%)",
            status.tier, status.name, status.description, status.progress
        )
    }
}

fn format_text(report: &Report<'_>, weeks: usize) -> String {
    let insights = report.insights;
    let score = &insights.profile_score;
    let mut output = String::new();

    output.push_str(&format!("\n=== GitHub Insights: {} ===\n\n", insights.user.login));

    if let Some(ref name) = insights.user.name {
        output.push_str(&format!("Name: {}\n", name));
    }
    if let Some(ref bio) = insights.user.bio {
        output.push_str(&format!("Bio: {}\n", bio));
    }

    output.push_str(&format!("Profile score: {}/100 ({})\n", score.score, score.grade));
    output.push_str(&format!(
        "  Completeness {:.1} | Repositories {:.1} | Skills {:.1} | Community {:.1} | Activity {:.1}\n",
        score.breakdown.profile_completeness,
        score.breakdown.repository_quality,
        score.breakdown.skills_diversity,
        score.breakdown.community_engagement,
        score.breakdown.activity_consistency
    ));
    output.push_str(&format!("Domain: {}\n", insights.domain.domain));
    output.push_str(&format!(
        "Repositories: {} ({} stars)\n",
        insights.repos_count, insights.total_stars
    ));
    output.push_str(&format!(
        "Followers: {}  Following: {}\n",
        insights.user.followers, insights.user.following
    ));

    if !insights.languages.percentages.is_empty() {
        output.push_str("\nLanguages:\n");
        for (language, pct) in &insights.languages.percentages {
            output.push_str(&format!("  - {}: {:.1}%\n", language, pct));
        }
    }

    if !insights.topics.is_empty() {
        let topics: Vec<String> = insights
            .topics
            .iter()
            .take(10)
            .map(|(topic, count)| format!("{} ({})", topic, count))
            .collect();
        output.push_str(&format!("\nTopics: {}\n", topics.join(", ")));
    }

    if !insights.top_starred.is_empty() {
        output.push_str("\nMost starred:\n");
        for repo in &insights.top_starred {
            output.push_str(&format!(
                "  - {} ({} stars)\n",
                repo.full_name(),
                repo.stargazers_count
            ));
        }
    }

    if !insights.top_active.is_empty() {
        output.push_str("\nMost active:\n");
        for repo in &insights.top_active {
            output.push_str(&format!(
                "  - {} ({} stars, {} forks, {} open issues)\n",
                repo.full_name(),
                repo.stargazers_count,
                repo.forks_count,
                repo.open_issues_count
            ));
        }
    }

    output.push_str(&format!(
        "\nCoding profile: {}\n",
        insights.commit_times.profile
    ));
    if let Some(hour) = peak_hour(insights) {
        output.push_str(&format!("Peak hour: {:02}:00\n", hour));
    }
    output.push_str(&format!("Active days: {}\n", insights.active_days));

    let recent = insights.weekly.recent(weeks);
    if !recent.is_empty() {
        output.push_str("\nRecent weeks:\n");
        for (week, count) in recent {
            output.push_str(&format!("  {}: {}\n", week, count));
        }
    }

    if let Some(board) = report.leaderboard {
        output.push_str("\nLeaderboard:\n");
        for entry in board {
            output.push_str(&format!(
                "  #{} {} - {} ({}), {} stars\n",
                entry.rank.unwrap_or_default(),
                entry.username,
                entry.score,
                entry.grade,
                entry.total_stars
            ));
        }
    }

    if let Some(achievements) = report.achievements {
        output.push_str(&format!(
            "\nAchievements: {}/{} ({}%)\n",
            achievements.unlocked_count, achievements.total, achievements.completion_percentage
        ));
        for status in &achievements.unlocked {
            output.push_str(&format!("  + {}\n", status_line(status)));
        }
        for status in achievements.locked.iter().take(5) {
            output.push_str(&format!("  - {}\n", status_line(status)));
        }
    }

    output
}

fn format_markdown(report: &Report<'_>, weeks: usize) -> String {
    let insights = report.insights;
    let score = &insights.profile_score;
    let mut output = String::new();

    output.push_str(&format!("# GitHub Insights: {}\n\n", insights.user.login));

    if let Some(ref name) = insights.user.name {
        output.push_str(&format!("**Name:** {}\n\n", name));
    }
    if let Some(ref bio) = insights.user.bio {
        output.push_str(&format!("> {}\n\n", bio));
    }

    output.push_str("## Summary\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Profile Score | {}/100 ({}) |\n", score.score, score.grade));
    output.push_str(&format!("| Domain | {} |\n", insights.domain.domain));
    output.push_str(&format!("| Repositories | {} |\n", insights.repos_count));
    output.push_str(&format!("| Stars | {} |\n", insights.total_stars));
    output.push_str(&format!("| Followers | {} |\n", insights.user.followers));
    output.push_str(&format!("| Coding Profile | {} |\n", insights.commit_times.profile));
    output.push_str(&format!("| Active Days | {} |\n", insights.active_days));

    output.push_str("\n## Score Breakdown\n\n");
    output.push_str("| Category | Points |\n|----------|--------|\n");
    for (label, points) in [
        ("Profile Completeness", score.breakdown.profile_completeness),
        ("Repository Quality", score.breakdown.repository_quality),
        ("Skills & Diversity", score.breakdown.skills_diversity),
        ("Community Engagement", score.breakdown.community_engagement),
        ("Activity & Consistency", score.breakdown.activity_consistency),
    ] {
        output.push_str(&format!("| {} | {:.1} |\n", label, points));
    }

    if !insights.languages.percentages.is_empty() {
        output.push_str("\n## Languages\n\n");
        output.push_str("| Language | Share |\n|----------|-------|\n");
        for (language, pct) in &insights.languages.percentages {
            output.push_str(&format!("| {} | {:.1}% |\n", language, pct));
        }
    }

    if !insights.top_starred.is_empty() {
        output.push_str("\n## Top Repositories\n\n");
        for repo in &insights.top_starred {
            output.push_str(&format!(
                "- **{}**: {} stars{}\n",
                repo.full_name(),
                repo.stargazers_count,
                repo.description
                    .as_deref()
                    .map(|d| format!(" - {}", d))
                    .unwrap_or_default()
            ));
        }
    }

    let recent = insights.weekly.recent(weeks);
    if !recent.is_empty() {
        output.push_str("\n## Recent Activity\n\n");
        output.push_str("| Week | Events |\n|------|--------|\n");
        for (week, count) in recent {
            output.push_str(&format!("| {} | {} |\n", week, count));
        }
    }

    if let Some(board) = report.leaderboard {
        output.push_str("\n## Leaderboard\n\n");
        output.push_str("| Rank | User | Score | Grade | Stars |\n");
        output.push_str("|------|------|-------|-------|-------|\n");
        for entry in board {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                entry.rank.unwrap_or_default(),
                entry.username,
                entry.score,
                entry.grade,
                entry.total_stars
            ));
        }
    }

    if let Some(achievements) = report.achievements {
        output.push_str(&format!(
            "\n## Achievements ({}/{})\n\n",
            achievements.unlocked_count, achievements.total
        ));
        for status in &achievements.unlocked {
            output.push_str(&format!("- **{}** ({}): {}\n", status.name, status.tier, status.description));
        }
        for status in achievements.locked.iter().take(5) {
            output.push_str(&format!(
                "- {} ({}): {}%\n",
                status.name, status.tier, status.progress
            ));
        }
    }

    output.push_str("\n---\n*Generated by gitinsights*\n");

    output
}
