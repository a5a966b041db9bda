//! Service inquiry endpoint
//!
//! Sequence per request:
//! 1. Read the multipart form (text fields plus up to [`MAX_FILES`] files)
//! 2. Validate; reject with every offending field
//! 3. Insert the row; a datastore failure fails the request
//! 4. Upload files one at a time; a failed file is logged and skipped
//! 5. Notify the webhook; a failure is logged and ignored
//!
//! The row is durable before any upload or notification is attempted, so
//! partial success still answers "received".

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info, warn};

use super::SubmissionResponse;
use crate::db;
use crate::services::blob_store::sanitize_filename;
use crate::services::{BlobStore, Notification};
use crate::validation::InquiryForm;
use crate::{ApiError, ApiResult, AppState};

/// Most files accepted on one inquiry
pub const MAX_FILES: usize = 5;

/// Form field names that carry attachments
const FILE_FIELDS: [&str; 3] = ["files", "files[]", "file"];

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One attachment held in memory until the row is stored
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("Malformed form data: {}", e.body_text()))
    }
}

/// Drain the multipart stream into form fields and attachments
///
/// Empty file parts (an untouched file input) are dropped. More than
/// [`MAX_FILES`] files, or more than `max_bytes` across all files, is a
/// client error.
pub async fn read_inquiry_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> ApiResult<(InquiryForm, Vec<UploadedFile>)> {
    let mut form = InquiryForm::default();
    let mut files: Vec<UploadedFile> = Vec::new();
    let mut total_bytes = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        if file_name.is_none() && !FILE_FIELDS.contains(&name.as_str()) {
            let value = field.text().await.map_err(multipart_error)?;
            if !form.set_field(&name, value) {
                debug!(field = %name, "Ignoring unknown inquiry field");
            }
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            continue;
        }

        if files.len() == MAX_FILES {
            return Err(ApiError::BadRequest(format!(
                "At most {} files may be attached",
                MAX_FILES
            )));
        }
        total_bytes += bytes.len();
        if total_bytes > max_bytes {
            return Err(ApiError::BadRequest(format!(
                "Attachments exceed the {} byte limit",
                max_bytes
            )));
        }

        files.push(UploadedFile {
            filename: file_name.unwrap_or_default(),
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok((form, files))
}

/// Upload each file in turn, returning the URLs of those that succeeded
pub async fn upload_files(
    store: &dyn BlobStore,
    inquiry_id: &str,
    files: Vec<UploadedFile>,
) -> Vec<String> {
    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let pathname = format!("inquiries/{}/{}", inquiry_id, sanitize_filename(&file.filename));
        match store.put(&pathname, &file.content_type, file.bytes).await {
            Ok(url) => urls.push(url),
            Err(e) => warn!(
                inquiry_id = %inquiry_id,
                file = %file.filename,
                "File upload failed, continuing without it: {}",
                e
            ),
        }
    }
    urls
}

/// POST /api/inquiries
///
/// **Request:** `multipart/form-data` with the inquiry fields and up to five
/// `files` parts.
/// **Response:** `201 {"success": true, "message": "...", "id": "..."}`
///
/// **Errors:**
/// - 400 Bad Request: validation failure (`errors` lists each field), malformed
///   form, too many or too large attachments
/// - 413 Payload Too Large: request body over the router limit
/// - 500 Internal Server Error: inquiry could not be stored
pub async fn submit_inquiry(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let (form, files) = read_inquiry_form(multipart, state.max_upload_bytes).await?;
    let submission = form.validate().map_err(ApiError::Validation)?;

    let id = db::insert_inquiry(&state.db, &submission).await?;
    info!(inquiry_id = %id, files = files.len(), "Inquiry stored");

    let attempted = files.len();
    let file_urls = upload_files(state.blob_store.as_ref(), &id, files).await;
    if file_urls.len() < attempted {
        warn!(
            inquiry_id = %id,
            "{} of {} file(s) uploaded",
            file_urls.len(),
            attempted
        );
    }

    if !file_urls.is_empty() {
        if let Err(e) = db::attach_file_urls(&state.db, &id, &file_urls).await {
            warn!(inquiry_id = %id, "Failed to record file URLs: {}", e);
        }
    }

    let notification = Notification::inquiry(&id, &submission, &file_urls);
    if let Err(e) = state.notifier.notify(&notification).await {
        warn!(inquiry_id = %id, "Inquiry notification failed: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            success: true,
            message: "Your inquiry was received. I'll be in touch within two business days."
                .to_string(),
            id,
        }),
    ))
}
