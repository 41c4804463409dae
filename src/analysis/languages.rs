use std::collections::{BTreeMap, HashMap};

use crate::models::insights::LanguageDistribution;
use crate::models::user::RepoSummary;

/// Per-repository language byte counts keyed by `owner/name`.
pub type RepoLanguages = HashMap<String, HashMap<String, u64>>;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sums language bytes over `repos` and converts them into a percentage
/// distribution. Repositories without an entry in `languages` contribute
/// nothing.
pub fn aggregate_languages(repos: &[RepoSummary], languages: &RepoLanguages) -> LanguageDistribution {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();

    for repo in repos {
        let Some(breakdown) = languages.get(&repo.full_name()) else {
            continue;
        };
        for (language, bytes) in breakdown {
            *totals.entry(language.clone()).or_insert(0) += bytes;
        }
    }

    let grand_total: u64 = totals.values().sum();
    if grand_total == 0 {
        return LanguageDistribution {
            totals,
            ..Default::default()
        };
    }

    let mut sorted: Vec<(&String, &u64)> = totals.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let percentages: Vec<(String, f64)> = sorted
        .into_iter()
        .map(|(language, bytes)| {
            let share = *bytes as f64 / grand_total as f64 * 100.0;
            (language.clone(), round1(share))
        })
        .collect();

    let top3 = percentages.iter().take(3).cloned().collect();

    LanguageDistribution {
        totals,
        percentages,
        top3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::RepositoryOwner;

    fn repo(name: &str) -> RepoSummary {
        RepoSummary {
            owner: RepositoryOwner {
                login: "dev".to_string(),
            },
            name: name.to_string(),
            stargazers_count: 100,
            forks_count: 0,
            open_issues_count: 0,
            topics: Vec::new(),
            description: None,
            language: None,
            fork: false,
            pushed_at: None,
        }
    }

    fn bytes(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(l, b)| (l.to_string(), *b)).collect()
    }

    #[test]
    fn test_single_repo_distribution() {
        let repos = vec![repo("app")];
        let mut languages = RepoLanguages::new();
        languages.insert("dev/app".to_string(), bytes(&[("JS", 8000), ("Python", 2000)]));

        let dist = aggregate_languages(&repos, &languages);
        assert_eq!(
            dist.percentages,
            vec![("JS".to_string(), 80.0), ("Python".to_string(), 20.0)]
        );
        assert_eq!(dist.top3, dist.percentages);
        assert_eq!(dist.totals["JS"], 8000);
    }

    #[test]
    fn test_sums_across_repos_and_rounds() {
        let repos = vec![repo("a"), repo("b"), repo("c")];
        let mut languages = RepoLanguages::new();
        languages.insert("dev/a".to_string(), bytes(&[("Rust", 1000), ("Shell", 10)]));
        languages.insert("dev/b".to_string(), bytes(&[("Rust", 500), ("Go", 700)]));
        languages.insert("dev/c".to_string(), bytes(&[("TypeScript", 333), ("Go", 100)]));

        let dist = aggregate_languages(&repos, &languages);
        let names: Vec<_> = dist.percentages.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go", "TypeScript", "Shell"]);
        assert_eq!(dist.top3.len(), 3);

        let sum: f64 = dist.percentages.iter().map(|(_, p)| p).sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum was {}", sum);
        for (_, pct) in &dist.percentages {
            assert_eq!(*pct, (pct * 10.0).round() / 10.0);
        }
    }

    #[test]
    fn test_empty_and_missing_data() {
        let empty = aggregate_languages(&[], &RepoLanguages::new());
        assert!(empty.percentages.is_empty());
        assert!(empty.top3.is_empty());

        let dist = aggregate_languages(&[repo("unfetched")], &RepoLanguages::new());
        assert!(dist.percentages.is_empty());
        assert!(dist.totals.is_empty());
    }
}
