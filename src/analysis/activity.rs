//! Time-bucketed activity: hour-of-day and weekday histograms, the coding
//! profile classification, and the week-keyed timeline.
//!
//! Records whose timestamp is missing or unparseable are skipped. Partial
//! activity data is still worth reporting.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use std::collections::{BTreeMap, HashSet};

use crate::models::commit::{CommitRecord, GitHubEvent};
use crate::models::insights::{ActivityProfile, CodingProfile, WeeklyActivity};

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Buckets code-activity events by hour and weekday after shifting them by
/// `offset_minutes`, then classifies the profile. Night has to strictly beat
/// early for a night-coder.
pub fn hour_distribution(events: &[GitHubEvent], offset_minutes: i32) -> ActivityProfile {
    let shift = Duration::minutes(offset_minutes as i64);
    let mut profile = ActivityProfile::default();

    for event in events.iter().filter(|e| e.is_code_activity()) {
        let Some(ts) = event.created_at.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let local = ts + shift;
        profile.hours[local.hour() as usize] += 1;
        profile.weekdays[local.weekday().num_days_from_sunday() as usize] += 1;
    }

    profile.profile = if profile.night_total() > profile.early_total() {
        CodingProfile::NightCoder
    } else {
        CodingProfile::EarlyBird
    };

    profile
}

/// Week key `YYYY-Www` where `ww = ceil((days since Jan 1 + weekday of Jan 1 + 1) / 7)`.
///
/// This is not ISO-8601 week numbering. Stored timelines were keyed with
/// this formula, so it must not change: the fractional day count means a
/// week rolls over just after midnight at the start of each Saturday-aligned
/// block, and late-December dates can land in week 53 or 54.
pub fn week_key(ts: &DateTime<Utc>) -> Option<String> {
    let year = ts.year();
    let onejan = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    let days = (*ts - onejan).num_milliseconds() as f64 / 86_400_000.0;
    let onejan_weekday = onejan.weekday().num_days_from_sunday() as f64;
    let week = ((days + onejan_weekday + 1.0) / 7.0).ceil() as u32;
    Some(format!("{}-W{:02}", year, week))
}

fn timeline<'a>(
    events: &'a [GitHubEvent],
    commits: &'a [CommitRecord],
) -> impl Iterator<Item = DateTime<Utc>> + 'a {
    events
        .iter()
        .filter_map(|e| e.created_at.as_deref())
        .chain(commits.iter().filter_map(|c| c.authored_at()))
        .filter_map(parse_timestamp)
}

/// Counts every event and commit per week key, newest week first. No window
/// is applied here; callers slice with [`WeeklyActivity::recent`].
pub fn weekly_activity(events: &[GitHubEvent], commits: &[CommitRecord]) -> WeeklyActivity {
    let mut weeks: BTreeMap<String, u32> = BTreeMap::new();

    for ts in timeline(events, commits) {
        if let Some(key) = week_key(&ts) {
            *weeks.entry(key).or_insert(0) += 1;
        }
    }

    WeeklyActivity(weeks.into_iter().rev().collect())
}

/// Distinct UTC calendar days with at least one event or commit.
pub fn active_days(events: &[GitHubEvent], commits: &[CommitRecord]) -> u32 {
    timeline(events, commits)
        .map(|ts| ts.date_naive())
        .collect::<HashSet<_>>()
        .len() as u32
}
