//! Article catalogue endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    Json,
};
use serde::Deserialize;

use super::bad_query;
use crate::content::{articles, Article};
use crate::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub tag: Option<String>,
}

/// GET /api/articles?tag=...
pub async fn list_articles(
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Article>>> {
    let Query(query) = query.map_err(bad_query)?;
    let list = match query.tag.as_deref() {
        Some(tag) => articles::with_tag(tag).into_iter().copied().collect(),
        None => articles::all().to_vec(),
    };
    Ok(Json(list))
}

/// GET /api/articles/:slug
pub async fn get_article(Path(slug): Path<String>) -> ApiResult<Json<Article>> {
    articles::find(&slug)
        .copied()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Article '{}'", slug)))
}
