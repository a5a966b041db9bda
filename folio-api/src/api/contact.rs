//! Contact form endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use super::SubmissionResponse;
use crate::db;
use crate::services::Notification;
use crate::validation::ContactForm;
use crate::{ApiError, ApiResult, AppState};

/// POST /api/contact
///
/// **Request:** `{"name": "...", "email": "...", "subject": "...", "message": "..."}`
/// **Response:** `201 {"success": true, "message": "...", "id": "..."}`
///
/// **Errors:**
/// - 400 Bad Request: malformed JSON, or field-level validation failure
/// - 500 Internal Server Error: message could not be stored
///
/// **Note:** webhook failures are logged and do not fail the request
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let Json(form) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let submission = form.validate().map_err(ApiError::Validation)?;

    let id = db::insert_contact_message(&state.db, &submission).await?;
    info!(message_id = %id, "Contact message stored");

    if let Err(e) = state
        .notifier
        .notify(&Notification::contact(&id, &submission))
        .await
    {
        warn!(message_id = %id, "Contact notification failed: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Thanks for reaching out! I'll get back to you soon.".to_string(),
            id,
        }),
    ))
}
