//! Project content endpoints
//!
//! Listings return metadata only; the detail endpoint includes the body.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::content::projects::{DEFAULT_RELATED_LIMIT, MAX_RELATED_LIMIT};
use super::bad_query;
use crate::content::{Project, ProjectMeta};
use crate::{ApiResult, AppState};

/// Query parameters for GET /api/projects
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    /// Only projects in this category (case-insensitive)
    pub category: Option<String>,
    /// Only projects carrying this tag (case-insensitive)
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn into_meta(projects: Vec<Project>) -> Vec<ProjectMeta> {
    projects.into_iter().map(|p| p.meta).collect()
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    query: Result<Query<ProjectListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProjectMeta>>> {
    let Query(query) = query.map_err(bad_query)?;
    let projects = state
        .projects
        .list()
        .await?
        .into_iter()
        .filter(|p| match &query.category {
            Some(want) => p.meta.category.as_deref().is_some_and(|c| eq_ignore_case(c, want)),
            None => true,
        })
        .filter(|p| match &query.tag {
            Some(want) => p.meta.tags.iter().any(|t| eq_ignore_case(t, want)),
            None => true,
        })
        .collect();

    Ok(Json(into_meta(projects)))
}

/// GET /api/projects/featured?limit=N
pub async fn featured_projects(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProjectMeta>>> {
    let Query(query) = query.map_err(bad_query)?;
    let projects = state.projects.featured(query.limit).await?;
    Ok(Json(into_meta(projects)))
}

/// GET /api/projects/:slug
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.get(&slug).await?))
}

/// GET /api/projects/:slug/related?limit=N
///
/// Defaults to three results; limits above the maximum are clamped.
pub async fn related_projects(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProjectMeta>>> {
    let Query(query) = query.map_err(bad_query)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .min(MAX_RELATED_LIMIT);
    let projects = state.projects.related(&slug, limit).await?;
    Ok(Json(into_meta(projects)))
}
