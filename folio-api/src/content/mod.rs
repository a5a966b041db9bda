//! Site content: project files, the article catalogue and the current-focus document

pub mod articles;
pub mod focus;
pub mod frontmatter;
pub mod projects;

pub use articles::Article;
pub use projects::{Project, ProjectMeta, ProjectStore};
