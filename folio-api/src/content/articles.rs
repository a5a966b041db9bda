//! Published articles
//!
//! Articles are written and hosted elsewhere; the site only lists them, so the
//! catalogue is a static table compiled into the binary.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    /// Publication date, `YYYY-MM-DD`
    pub date: &'static str,
    pub tags: &'static [&'static str],
    /// Canonical URL of the published piece
    pub url: &'static str,
    pub reading_time_minutes: u32,
}

/// Newest first
pub static ARTICLES: &[Article] = &[
    Article {
        slug: "shipping-a-side-project",
        title: "Shipping a Side Project Without Burning Out",
        summary: "Scoping, cutting features, and deciding what done means when nobody is waiting for it.",
        date: "2024-09-14",
        tags: &["career", "productivity"],
        url: "https://dev.to/folio/shipping-a-side-project",
        reading_time_minutes: 7,
    },
    Article {
        slug: "typed-forms-end-to-end",
        title: "Typed Forms End to End",
        summary: "One schema shared between the browser and the API, and what it catches before users do.",
        date: "2024-05-02",
        tags: &["typescript", "forms", "api"],
        url: "https://dev.to/folio/typed-forms-end-to-end",
        reading_time_minutes: 9,
    },
    Article {
        slug: "mdx-content-pipeline",
        title: "A Tiny MDX Content Pipeline",
        summary: "Frontmatter, hidden drafts and related posts with nothing but the filesystem.",
        date: "2023-11-20",
        tags: &["mdx", "content", "web"],
        url: "https://dev.to/folio/mdx-content-pipeline",
        reading_time_minutes: 6,
    },
    Article {
        slug: "student-ml-projects",
        title: "What Makes a Student ML Project Succeed",
        summary: "Datasets, deadlines and scope: lessons from helping final-year students ship.",
        date: "2023-06-08",
        tags: &["machine-learning", "freelance"],
        url: "https://dev.to/folio/student-ml-projects",
        reading_time_minutes: 8,
    },
];

/// All articles, newest first
pub fn all() -> &'static [Article] {
    ARTICLES
}

pub fn find(slug: &str) -> Option<&'static Article> {
    ARTICLES.iter().find(|a| a.slug == slug)
}

/// Articles carrying `tag` (case-insensitive)
pub fn with_tag(tag: &str) -> Vec<&'static Article> {
    let tag = tag.trim().to_lowercase();
    ARTICLES
        .iter()
        .filter(|a| a.tags.iter().any(|t| t.to_lowercase() == tag))
        .collect()
}
