use std::collections::BTreeMap;

use crate::models::insights::{DomainScore, GENERALIST};
use crate::taxonomy::{DomainTaxonomy, DomainWeights, DOMAIN_WEIGHTS};

pub struct DomainClassifier {
    taxonomy: DomainTaxonomy,
    weights: DomainWeights,
}

impl DomainClassifier {
    pub fn new() -> Self {
        Self::with_weights(DOMAIN_WEIGHTS)
    }

    pub fn with_weights(weights: DomainWeights) -> Self {
        Self {
            taxonomy: DomainTaxonomy::new(),
            weights,
        }
    }

    /// Scores every domain from language shares and topic tags and picks the
    /// leader, falling back to the generalist label when no domain clears the
    /// threshold. `top_topics` is conventionally the ten most frequent tags.
    pub fn classify(
        &self,
        language_percentages: &[(String, f64)],
        top_topics: &[(String, u32)],
    ) -> DomainScore {
        let mut scores = BTreeMap::new();
        let mut leader: Option<(&str, f64)> = None;

        for domain in self.taxonomy.domains() {
            let language_score: f64 = language_percentages
                .iter()
                .filter(|(language, _)| domain.languages.contains(language))
                .map(|(_, pct)| (pct / self.weights.language_divisor) * domain.weight)
                .sum();

            let matched_topics = top_topics
                .iter()
                .filter(|(topic, _)| domain.topics.contains(topic))
                .count();
            let topic_score =
                matched_topics as f64 * (domain.weight * self.weights.topic_factor);

            let score = language_score + topic_score;
            scores.insert(domain.name.clone(), score);

            if leader.map_or(true, |(_, best)| score > best) {
                leader = Some((domain.name.as_str(), score));
            }
        }

        let domain = match leader {
            Some((name, score)) if score > self.weights.generalist_threshold => name.to_string(),
            _ => GENERALIST.to_string(),
        };

        tracing::debug!("Classified domain as {}", domain);
        DomainScore { domain, scores }
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(l, p)| (l.to_string(), *p)).collect()
    }

    fn topics(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn test_systems_programmer() {
        let classifier = DomainClassifier::new();
        let result = classifier.classify(
            &langs(&[("Rust", 60.0), ("C", 20.0), ("Python", 20.0)]),
            &topics(&[("rust", 3), ("cli", 1)]),
        );

        assert_eq!(result.domain, "Systems Programming");
        assert!((result.scores["Systems Programming"] - 40.75).abs() < 1e-9);
        assert!((result.scores["Machine Learning"] - 10.0).abs() < 1e-9);
        assert!((result.scores["Data Science"] - 7.2).abs() < 1e-9);
        assert_eq!(result.scores["Web Development"], 0.0);
    }

    #[test]
    fn test_topics_count_once_regardless_of_frequency() {
        let classifier = DomainClassifier::new();
        let result = classifier.classify(&[], &topics(&[("blockchain", 9), ("ethereum", 1)]));

        // 2 topics * 3.0 * 0.3
        assert!((result.scores["Blockchain"] - 1.8).abs() < 1e-9);
        assert_eq!(result.domain, GENERALIST);
    }

    #[test]
    fn test_no_signal_is_generalist() {
        let classifier = DomainClassifier::new();
        let result = classifier.classify(&langs(&[("Brainfuck", 100.0)]), &[]);
        assert_eq!(result.domain, GENERALIST);
        assert!(result.scores.values().all(|s| *s == 0.0));

        let empty = classifier.classify(&[], &[]);
        assert!(empty.is_generalist());
    }

    #[test]
    fn test_threshold_is_strict() {
        let classifier = DomainClassifier::new();

        // 10 / 5 * 1.0 == 2.0 does not clear the threshold
        let at = classifier.classify(&langs(&[("JavaScript", 10.0), ("Brainfuck", 90.0)]), &[]);
        assert_eq!(at.domain, GENERALIST);

        let above = classifier.classify(&langs(&[("JavaScript", 10.5), ("Brainfuck", 89.5)]), &[]);
        assert_eq!(above.domain, "Web Development");
    }
}
