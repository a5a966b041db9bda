//! folio-api library - HTTP API behind the portfolio site
//!
//! Serves project content, articles and the current-focus document, proxies
//! GitHub profile stats, and accepts contact messages and service inquiries.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::Router;
use folio_common::Config;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod api;
pub mod content;
pub mod db;
pub mod error;
pub mod services;
pub mod validation;

pub use crate::error::{ApiError, ApiResult};

use content::ProjectStore;
use services::{
    BlobStore, DisabledBlobStore, DisabledNotifier, GithubClient, HttpBlobStore, Notifier,
    SlackNotifier,
};

/// Headroom above the upload cap for the text fields and multipart framing
pub const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Submission datastore
    pub db: SqlitePool,
    /// Project files, re-read per request
    pub projects: ProjectStore,
    /// Root of the content tree
    pub content_dir: PathBuf,
    /// Attachment storage (best effort)
    pub blob_store: Arc<dyn BlobStore>,
    /// Submission notifications (best effort)
    pub notifier: Arc<dyn Notifier>,
    /// GitHub proxy; `None` when no username is configured
    pub github: Option<GithubClient>,
    /// Combined byte cap for files on one inquiry
    pub max_upload_bytes: usize,
    /// CORS origins; empty allows any
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// State with external collaborators disabled
    pub fn new(db: SqlitePool, content_dir: &Path) -> Self {
        Self {
            db,
            projects: ProjectStore::new(content_dir),
            content_dir: content_dir.to_path_buf(),
            blob_store: Arc::new(DisabledBlobStore),
            notifier: Arc::new(DisabledNotifier),
            github: None,
            max_upload_bytes: folio_common::config::DEFAULT_MAX_UPLOAD_BYTES,
            allowed_origins: Vec::new(),
        }
    }

    /// State wired to the collaborators named in `config`
    pub fn from_config(db: SqlitePool, config: &Config) -> anyhow::Result<Self> {
        let mut state = Self::new(db, &config.content_dir);
        state.max_upload_bytes = config.max_upload_bytes;
        state.allowed_origins = config.allowed_origins.clone();

        if let Some(token) = &config.blob.token {
            state.blob_store = Arc::new(HttpBlobStore::new(&config.blob.base_url, token)?);
        }
        if let Some(url) = &config.slack.webhook_url {
            state.notifier = Arc::new(SlackNotifier::new(url)?);
        }
        if let Some(username) = &config.github.username {
            state.github = Some(GithubClient::new(
                &config.github.api_base,
                username,
                config.github.token.as_deref(),
            )?);
        }
        Ok(state)
    }

    pub fn with_blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = store;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_github(mut self, client: GithubClient) -> Self {
        self.github = Some(client);
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    info!("CORS restricted to {} origin(s)", origins.len());
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let upload_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    let submissions = Router::new()
        .route("/api/contact", post(api::submit_contact))
        .route(
            "/api/inquiries",
            post(api::submit_inquiry).layer(DefaultBodyLimit::max(upload_limit)),
        );

    let content = Router::new()
        .route("/api/projects", get(api::list_projects))
        .route("/api/projects/featured", get(api::featured_projects))
        .route("/api/projects/:slug", get(api::get_project))
        .route("/api/projects/:slug/related", get(api::related_projects))
        .route("/api/articles", get(api::list_articles))
        .route("/api/articles/:slug", get(api::get_article))
        .route("/api/current-focus", get(api::current_focus))
        .route("/api/github/stats", get(api::github_stats));

    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .merge(submissions)
        .merge(content)
        .merge(api::health_routes())
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
