//! Current-focus endpoint

use axum::{extract::State, Json};
use serde_json::Value;

use crate::content::focus::load_current_focus;
use crate::{ApiResult, AppState};

/// GET /api/current-focus
pub async fn current_focus(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    Ok(Json(load_current_focus(&state.content_dir).await?))
}
