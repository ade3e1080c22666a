//! The static section table and the built-in sample articles.
//!
//! Both tables are compiled in and never mutated. The section table maps a
//! section id to the location of its digest, relative to the configured
//! source; the sample table provides three stand-in articles per section for
//! when the live digest is unavailable.

use crate::models::Article;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Maximum number of articles shown for a section.
pub const MAX_ARTICLES: usize = 3;

/// One topical section and where its digest lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Identifier used by controls and on the command line (e.g. `politics`).
    pub id: &'static str,
    /// Human label for the section control.
    pub label: &'static str,
    /// Digest location relative to the source root.
    pub location: &'static str,
}

/// Every known section, in control order. The first entry is loaded on start.
pub static SECTIONS: [Section; 5] = [
    Section {
        id: "politics",
        label: "Politics",
        location: "outputs/politics.json",
    },
    Section {
        id: "economy",
        label: "Economy",
        location: "outputs/economy.json",
    },
    Section {
        id: "society",
        label: "Society",
        location: "outputs/society.json",
    },
    Section {
        id: "culture",
        label: "Culture",
        location: "outputs/culture.json",
    },
    Section {
        id: "it_science",
        label: "IT/Science",
        location: "outputs/it_science.json",
    },
];

/// Look up a section by id.
pub fn resolve(id: &str) -> Option<&'static Section> {
    SECTIONS.iter().find(|s| s.id == id)
}

/// The section loaded when nothing has been selected yet.
pub fn first() -> &'static Section {
    &SECTIONS[0]
}

// (section id, title label, content label)
const SAMPLE_LABELS: [(&str, &str, &str); 5] = [
    ("politics", "Politics", "politics"),
    ("economy", "Economy", "economy"),
    ("society", "Society", "society"),
    ("culture", "Culture", "culture"),
    ("it_science", "IT", "IT"),
];

static SAMPLES: Lazy<HashMap<&'static str, Vec<Article>>> = Lazy::new(|| {
    SAMPLE_LABELS
        .iter()
        .map(|&(id, title_label, content_label)| {
            let articles = (1..=MAX_ARTICLES as u64)
                .map(|n| Article {
                    title: format!("Sample {title_label} {n}"),
                    outlet: "Mock".to_string(),
                    views: 1100 - n * 100,
                    comments: 11 - n,
                    published_at: String::new(),
                    content: format!("Demo content for {content_label} {n}."),
                    url: String::new(),
                })
                .collect();
            (id, articles)
        })
        .collect()
});

/// The first [`MAX_ARTICLES`] sample articles for a section, or none for an
/// unknown id.
pub fn sample_articles(id: &str) -> Vec<Article> {
    SAMPLES
        .get(id)
        .map(|articles| articles.iter().take(MAX_ARTICLES).cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_sections() {
        let section = resolve("it_science").unwrap();
        assert_eq!(section.location, "outputs/it_science.json");
        assert_eq!(resolve("politics").unwrap().location, "outputs/politics.json");
    }

    #[test]
    fn test_resolve_unknown_section() {
        assert!(resolve("sports").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("Politics").is_none());
    }

    #[test]
    fn test_first_section_is_politics() {
        assert_eq!(first().id, "politics");
    }

    #[test]
    fn test_every_section_has_three_samples() {
        for section in SECTIONS {
            let samples = sample_articles(section.id);
            assert_eq!(samples.len(), 3, "section {}", section.id);
            assert!(samples.iter().all(|a| !a.title.is_empty()));
        }
    }

    #[test]
    fn test_sample_contents() {
        let samples = sample_articles("economy");
        let titles: Vec<_> = samples.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Sample Economy 1", "Sample Economy 2", "Sample Economy 3"]);
        assert_eq!(samples[0].views, 1000);
        assert_eq!(samples[2].views, 800);
        assert_eq!(samples[1].comments, 9);
        assert_eq!(samples[0].outlet, "Mock");
        assert_eq!(samples[0].content, "Demo content for economy 1.");
        assert!(samples[0].published_at.is_empty());

        let it = sample_articles("it_science");
        assert_eq!(it[2].title, "Sample IT 3");
        assert_eq!(it[2].content, "Demo content for IT 3.");
    }

    #[test]
    fn test_unknown_section_has_no_samples() {
        assert!(sample_articles("weather").is_empty());
    }
}
