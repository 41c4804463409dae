use std::collections::HashMap;

use crate::models::user::RepoSummary;

/// Counts topic tags across repositories, most frequent first. Tags are
/// compared exactly; equal counts are ordered by tag name.
pub fn topic_frequency(repos: &[RepoSummary]) -> Vec<(String, u32)> {
    let mut counts: HashMap<&str, u32> = HashMap::new();

    for topic in repos.iter().flat_map(|r| r.topics.iter()) {
        *counts.entry(topic.as_str()).or_insert(0) += 1;
    }

    let mut topics: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(topic, count)| (topic.to_string(), count))
        .collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    topics
}
