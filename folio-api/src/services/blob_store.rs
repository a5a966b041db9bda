//! Object storage for inquiry attachments
//!
//! `HttpBlobStore` speaks the blob service's REST upload API:
//! `PUT <base_url>/<pathname>` with a bearer token, answering `{"url": ...}`.
//! Without a token the service runs with `DisabledBlobStore`, which rejects
//! every upload; callers treat uploads as best effort either way.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Upload timeout per file
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest stored file name
const MAX_FILENAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob storage is not configured")]
    NotConfigured,

    #[error("Blob request failed: {0}")]
    Network(String),

    #[error("Blob store returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected blob store response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `pathname` and return the public URL
    async fn put(&self, pathname: &str, content_type: &str, bytes: Vec<u8>)
        -> Result<String, BlobError>;
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    url: String,
}

/// Blob store reached over HTTP
pub struct HttpBlobStore {
    http_client: Client,
    base_url: String,
    token: String,
}

impl HttpBlobStore {
    pub fn new(base_url: &str, token: &str) -> Result<Self, BlobError> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| BlobError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        let url = format!("{}/{}", self.base_url, pathname.trim_start_matches('/'));
        debug!(pathname = %pathname, size = bytes.len(), "Uploading blob");

        let response = self
            .http_client
            .put(&url)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "1")
            .body(bytes)
            .send()
            .await
            .map_err(|e| BlobError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PutResponse = response
            .json()
            .await
            .map_err(|e| BlobError::Parse(e.to_string()))?;
        Ok(parsed.url)
    }
}

/// Stand-in used when no blob token is configured
#[derive(Debug, Default)]
pub struct DisabledBlobStore;

#[async_trait]
impl BlobStore for DisabledBlobStore {
    async fn put(&self, _: &str, _: &str, _: Vec<u8>) -> Result<String, BlobError> {
        Err(BlobError::NotConfigured)
    }
}

/// Reduce a client-supplied file name to a safe path segment
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `-`.
/// Leading dots are dropped so the result is never a dotfile or `..`.
pub fn sanitize_filename(name: &str) -> String {
    // Browsers on Windows may send a full path
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);

    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        let mapped = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '-'
        };
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_start_matches('.').trim_matches('-');
    let mut cleaned: String = trimmed.chars().take(MAX_FILENAME_LEN).collect();
    if cleaned.is_empty() {
        cleaned = "file".to_string();
    }
    cleaned
}
