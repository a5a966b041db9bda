//! Project content loader
//!
//! Projects live as `<slug>.md` / `<slug>.mdx` files under
//! `<content_dir>/projects/`. The directory is re-read on every call; there is
//! no index or cache to invalidate.
//!
//! A project is hidden when its frontmatter sets `hidden: true` or its body
//! begins with [`HIDDEN_MARKER`]. Hidden projects are invisible to every query.

use chrono::NaiveDate;
use folio_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::frontmatter;

/// Body prefix that hides a project from every listing
pub const HIDDEN_MARKER: &str = "<!-- hidden -->";

/// Related-project count when the caller gives none
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Upper bound on any caller-supplied related limit
pub const MAX_RELATED_LIMIT: usize = 12;

const WORDS_PER_MINUTE: usize = 200;

/// Frontmatter keys understood in a project file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectFrontmatter {
    slug: Option<String>,
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
    #[serde(alias = "techStack")]
    tech: Vec<String>,
    featured: bool,
    order: Option<i64>,
    hidden: bool,
    image: Option<String>,
    github: Option<String>,
    #[serde(alias = "live", alias = "url")]
    demo: Option<String>,
    status: Option<String>,
}

/// Project metadata as served in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub tech: Vec<String>,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub reading_time_minutes: usize,
}

/// A project with its body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    #[serde(flatten)]
    pub meta: ProjectMeta,
    pub content: String,
}

/// Outcome of parsing one content file
#[derive(Debug)]
enum Parsed {
    Visible(Project),
    Hidden,
}

/// Estimated reading time, never less than one minute
pub fn reading_time_minutes(body: &str) -> usize {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

fn is_content_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("mdx")
    )
}

fn parse_project(path: &Path, source: &str) -> Result<Parsed> {
    let (fm, body): (ProjectFrontmatter, String) = frontmatter::parse(path, source)?;

    if fm.hidden || body.trim_start().starts_with(HIDDEN_MARKER) {
        return Ok(Parsed::Hidden);
    }

    let title = fm
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Content {
            path: path.to_path_buf(),
            message: "frontmatter has no title".to_string(),
        })?;

    let slug = fm
        .slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .ok_or_else(|| Error::Content {
            path: path.to_path_buf(),
            message: "cannot derive slug".to_string(),
        })?;

    let date = fm.date.as_deref().and_then(|raw| {
        let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
        if parsed.is_none() {
            warn!("Ignoring unparsable date '{}' in {}", raw, path.display());
        }
        parsed
    });

    let meta = ProjectMeta {
        slug,
        title,
        description: fm.description,
        date,
        category: fm.category,
        tags: fm.tags,
        tech: fm.tech,
        featured: fm.featured,
        order: fm.order,
        image: fm.image,
        github: fm.github,
        demo: fm.demo,
        status: fm.status,
        reading_time_minutes: reading_time_minutes(&body),
    };

    Ok(Parsed::Visible(Project {
        meta,
        content: body.trim().to_string(),
    }))
}

/// Listing order: explicit `order` ascending first, then newest date, then slug
pub fn compare_projects(a: &ProjectMeta, b: &ProjectMeta) -> Ordering {
    let by_order = match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    let by_date = match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_order.then(by_date).then_with(|| a.slug.cmp(&b.slug))
}

fn lowercase_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

/// Projects sharing the category or a tag with `target`, best matches first
///
/// Score is the number of shared tags plus one for a category match. Ties keep
/// the order of `projects`. `target` itself is never returned.
pub fn related_to(projects: &[Project], target: &ProjectMeta, limit: usize) -> Vec<Project> {
    let target_tags = lowercase_set(&target.tags);
    let target_category = target.category.as_deref().map(|c| c.trim().to_lowercase());

    let mut scored: Vec<(usize, &Project)> = projects
        .iter()
        .filter(|p| p.meta.slug != target.slug)
        .filter_map(|p| {
            let shared_tags = lowercase_set(&p.meta.tags)
                .intersection(&target_tags)
                .count();
            let same_category = match (&target_category, &p.meta.category) {
                (Some(want), Some(have)) => *want == have.trim().to_lowercase(),
                _ => false,
            };
            let score = shared_tags + usize::from(same_category);
            (score > 0).then_some((score, p))
        })
        .collect();

    // Stable sort keeps listing order for equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, p)| p.clone()).collect()
}

/// Reads project files from disk on demand
#[derive(Debug, Clone)]
pub struct ProjectStore {
    dir: PathBuf,
}

impl ProjectStore {
    /// Store rooted at `<content_dir>/projects`
    pub fn new(content_dir: &Path) -> Self {
        Self {
            dir: content_dir.join("projects"),
        }
    }

    /// All visible projects in listing order
    ///
    /// A missing directory yields an empty list. A file that cannot be read or
    /// parsed is logged and skipped.
    pub async fn list(&self) -> Result<Vec<Project>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Project directory not found: {}", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_content_file(&path) {
                continue;
            }
            // Follows symlinks, unlike DirEntry::file_type
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => paths.push(path),
                Ok(_) => debug!("Skipping non-file entry {}", path.display()),
                Err(e) => warn!("Skipping project entry {}: {}", path.display(), e),
            }
        }
        paths.sort();

        let mut projects: Vec<Project> = Vec::with_capacity(paths.len());
        for path in paths {
            let source = match tokio::fs::read_to_string(&path).await {
                Ok(source) => source,
                Err(e) => {
                    warn!("Skipping unreadable project file {}: {}", path.display(), e);
                    continue;
                }
            };
            match parse_project(&path, &source) {
                Ok(Parsed::Visible(project)) => {
                    if projects.iter().any(|p| p.meta.slug == project.meta.slug) {
                        warn!(
                            "Duplicate project slug '{}' in {}, skipping",
                            project.meta.slug,
                            path.display()
                        );
                        continue;
                    }
                    projects.push(project);
                }
                Ok(Parsed::Hidden) => debug!("Skipping hidden project {}", path.display()),
                Err(e) => warn!("Skipping project file: {}", e),
            }
        }

        projects.sort_by(|a, b| compare_projects(&a.meta, &b.meta));
        Ok(projects)
    }

    /// Featured projects in listing order, optionally capped
    pub async fn featured(&self, limit: Option<usize>) -> Result<Vec<Project>> {
        let featured = self.list().await?.into_iter().filter(|p| p.meta.featured);
        Ok(match limit {
            Some(n) => featured.take(n).collect(),
            None => featured.collect(),
        })
    }

    /// One visible project by slug
    pub async fn get(&self, slug: &str) -> Result<Project> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.meta.slug == slug)
            .ok_or_else(|| Error::NotFound(format!("Project '{}'", slug)))
    }

    /// Projects related to `slug`, at most `limit` (clamped to [`MAX_RELATED_LIMIT`])
    pub async fn related(&self, slug: &str, limit: usize) -> Result<Vec<Project>> {
        let projects = self.list().await?;
        let target = projects
            .iter()
            .find(|p| p.meta.slug == slug)
            .ok_or_else(|| Error::NotFound(format!("Project '{}'", slug)))?;
        Ok(related_to(&projects, &target.meta, limit.min(MAX_RELATED_LIMIT)))
    }
}
