use std::cmp::Ordering;

use crate::models::user::RepoSummary;

/// Weights of the activity proxy. This is a popularity-weighted heuristic,
/// not a recency measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityWeights {
    pub open_issues: f64,
    pub forks: f64,
    pub stars: f64,
}

pub const ACTIVITY_WEIGHTS: ActivityWeights = ActivityWeights {
    open_issues: 1.0,
    forks: 0.5,
    stars: 0.2,
};

pub fn activity_score(repo: &RepoSummary) -> f64 {
    repo.open_issues_count as f64 * ACTIVITY_WEIGHTS.open_issues
        + repo.forks_count as f64 * ACTIVITY_WEIGHTS.forks
        + repo.stargazers_count as f64 * ACTIVITY_WEIGHTS.stars
}

/// Top `n` repositories by stars. Equal counts keep their input order.
pub fn most_starred(repos: &[RepoSummary], n: usize) -> Vec<RepoSummary> {
    let mut sorted: Vec<&RepoSummary> = repos.iter().collect();
    sorted.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    sorted.into_iter().take(n).cloned().collect()
}

/// Top `n` repositories by [`activity_score`]. Equal scores keep their input order.
pub fn most_active(repos: &[RepoSummary], n: usize) -> Vec<RepoSummary> {
    let mut scored: Vec<(f64, &RepoSummary)> = repos.iter().map(|r| (activity_score(r), r)).collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().take(n).map(|(_, r)| r.clone()).collect()
}
