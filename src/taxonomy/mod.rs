pub mod achievements;

use std::collections::HashSet;

pub use achievements::catalog as achievement_catalog;

/// Constants of the domain scoring formula. Language share is divided by
/// `language_divisor` and each matched topic contributes `topic_factor` of
/// the domain weight, keeping language signal ten times stronger than topic
/// signal per unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainWeights {
    pub language_divisor: f64,
    pub topic_factor: f64,
    /// A leading score must exceed this or the user is a generalist.
    pub generalist_threshold: f64,
}

pub const DOMAIN_WEIGHTS: DomainWeights = DomainWeights {
    language_divisor: 5.0,
    topic_factor: 0.3,
    generalist_threshold: 2.0,
};

impl Default for DomainWeights {
    fn default() -> Self {
        DOMAIN_WEIGHTS
    }
}

#[derive(Debug, Clone)]
pub struct Domain {
    pub name: String,
    /// 1.0 for broad domains up to 3.0 for rare, specialised ones.
    pub weight: f64,
    pub languages: HashSet<String>,
    pub topics: HashSet<String>,
}

pub struct DomainTaxonomy {
    domains: Vec<Domain>,
}

impl DomainTaxonomy {
    pub fn new() -> Self {
        let mut taxonomy = Self { domains: Vec::new() };

        taxonomy.add_domain(
            "Web Development",
            1.0,
            &["JavaScript", "TypeScript", "HTML", "CSS", "SCSS", "Vue", "Svelte", "Astro"],
            &[
                "react", "vue", "angular", "svelte", "nextjs", "frontend", "web", "javascript",
                "typescript", "css", "html", "tailwindcss", "nodejs",
            ],
        );
        taxonomy.add_domain(
            "Backend Development",
            1.2,
            &["Java", "Go", "Ruby", "PHP", "Elixir", "Scala", "C#"],
            &[
                "api", "backend", "rest-api", "graphql", "microservices", "server", "express",
                "django", "flask", "fastapi", "spring-boot", "rails", "laravel",
            ],
        );
        taxonomy.add_domain(
            "Mobile Development",
            1.5,
            &["Swift", "Kotlin", "Dart", "Objective-C", "Java"],
            &["android", "ios", "flutter", "react-native", "mobile", "swiftui", "jetpack-compose"],
        );
        taxonomy.add_domain(
            "Data Science",
            1.8,
            &["Python", "R", "Jupyter Notebook", "Julia"],
            &[
                "data-science", "data-analysis", "pandas", "numpy", "jupyter", "visualization",
                "statistics", "data-visualization",
            ],
        );
        taxonomy.add_domain(
            "Machine Learning",
            2.5,
            &["Python", "Jupyter Notebook"],
            &[
                "machine-learning", "deep-learning", "tensorflow", "pytorch", "ai", "nlp",
                "computer-vision", "neural-network", "llm", "artificial-intelligence",
            ],
        );
        taxonomy.add_domain(
            "Systems Programming",
            2.5,
            &["C", "C++", "Rust", "Go", "Zig", "Assembly"],
            &[
                "rust", "systems-programming", "operating-system", "kernel", "compiler",
                "embedded", "low-level", "os",
            ],
        );
        taxonomy.add_domain(
            "DevOps & Cloud",
            2.0,
            &["Shell", "Dockerfile", "HCL", "PowerShell", "Nix"],
            &[
                "devops", "docker", "kubernetes", "terraform", "aws", "ci-cd", "cloud", "ansible",
                "infrastructure-as-code", "helm",
            ],
        );
        taxonomy.add_domain(
            "Game Development",
            2.0,
            &["C#", "C++", "GDScript", "Lua", "ShaderLab", "HLSL", "GLSL"],
            &["game", "gamedev", "unity", "godot", "unreal-engine", "game-engine", "opengl"],
        );
        taxonomy.add_domain(
            "Blockchain",
            3.0,
            &["Solidity", "Move", "Cairo", "Vyper"],
            &[
                "blockchain", "ethereum", "web3", "smart-contracts", "solidity", "defi", "nft",
                "crypto",
            ],
        );

        taxonomy
    }

    fn add_domain(&mut self, name: &str, weight: f64, languages: &[&str], topics: &[&str]) {
        self.domains.push(Domain {
            name: name.to_string(),
            weight,
            languages: languages.iter().map(|s| s.to_string()).collect(),
            topics: topics.iter().map(|s| s.to_string()).collect(),
        });
    }

    /// Catalog order; ties in classification resolve to the earliest entry.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn get(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }
}

impl Default for DomainTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_weights_stay_in_range() {
        let taxonomy = DomainTaxonomy::new();
        assert_eq!(taxonomy.domains().len(), 9);
        for domain in taxonomy.domains() {
            assert!(
                (1.0..=3.0).contains(&domain.weight),
                "{} has weight {}",
                domain.name,
                domain.weight
            );
            assert!(!domain.topics.is_empty());
        }
    }

    #[test]
    fn test_domain_lookup_is_exact() {
        let taxonomy = DomainTaxonomy::new();
        let systems = taxonomy.get("Systems Programming").unwrap();
        assert!(systems.languages.contains("Rust"));
        assert!(!systems.languages.contains("rust"));
        assert!(taxonomy.get("systems programming").is_none());
    }
}
