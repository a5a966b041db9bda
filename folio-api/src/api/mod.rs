//! HTTP API handlers for folio-api

pub mod articles;
pub mod contact;
pub mod focus;
pub mod github;
pub mod health;
pub mod inquiries;
pub mod projects;

pub use articles::{get_article, list_articles};
pub use contact::submit_contact;
pub use focus::current_focus;
pub use github::github_stats;
pub use health::health_routes;
pub use inquiries::submit_inquiry;
pub use projects::{featured_projects, get_project, list_projects, related_projects};

use axum::extract::rejection::QueryRejection;
use axum::http::Uri;
use serde::Serialize;

use crate::ApiError;

/// Body returned for an accepted submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Query-string rejection reported in the API error shape
pub(crate) fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}
