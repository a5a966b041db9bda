//! GitHub stats proxy endpoint

use axum::{extract::State, Json};
use tracing::warn;

use crate::services::GithubStats;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/github/stats
///
/// **Errors:**
/// - 502 Bad Gateway: GitHub unreachable or answered with an error
/// - 503 Service Unavailable: no GitHub username configured
pub async fn github_stats(State(state): State<AppState>) -> ApiResult<Json<GithubStats>> {
    let client = state
        .github
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("GitHub stats are not configured".to_string()))?;

    let stats = client.stats().await.map_err(|e| {
        warn!(user = %client.username(), "GitHub stats request failed: {}", e);
        ApiError::Upstream(e.to_string())
    })?;

    Ok(Json(stats))
}
