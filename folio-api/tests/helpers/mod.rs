//! Shared fixtures for folio-api integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use folio_api::services::{BlobError, BlobStore, Notification, Notifier, NotifyError};
use folio_common::db::init_database;
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Temporary database and content tree, removed on drop
pub struct TestContext {
    _dir: TempDir,
    pub db: SqlitePool,
    pub content_dir: PathBuf,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let db_url = format!("sqlite://{}", dir.path().join("folio-test.db").display());
        let db = init_database(&db_url).await.expect("Should init test database");

        let content_dir = dir.path().join("content");
        std::fs::create_dir_all(content_dir.join("projects")).expect("Should create content dir");

        Self {
            _dir: dir,
            db,
            content_dir,
        }
    }

    pub fn write_project(&self, file_name: &str, contents: &str) {
        std::fs::write(self.content_dir.join("projects").join(file_name), contents)
            .expect("Should write project file");
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.db)
            .await
            .expect("Should count rows")
    }
}

/// Blob store that records uploads, or fails every one
#[derive(Default)]
pub struct FakeBlobStore {
    pub fail: bool,
    pub uploads: Mutex<Vec<(String, String, usize)>>,
}

impl FakeBlobStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        if self.fail {
            return Err(BlobError::Network("connection refused".to_string()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((pathname.to_string(), content_type.to_string(), bytes.len()));
        Ok(format!("https://blob.test/{}", pathname))
    }
}

/// Notifier that records notifications, optionally reporting failure
#[derive(Default)]
pub struct FakeNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<Notification>>,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotifyError::Network("webhook unreachable".to_string()));
        }
        Ok(())
    }
}

/// Minimal multipart/form-data body builder
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: "folio-test-boundary-7MA4YWxkTrZu0gW".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// Multipart form with every required inquiry field filled in
pub fn valid_inquiry_form() -> MultipartBuilder {
    MultipartBuilder::new()
        .text("name", "Ada Lovelace")
        .text("email", "ada@example.com")
        .text("projectTitle", "Analytical engine notes")
        .text("details", "Help me annotate the Bernoulli number program.")
        .text("clientType", "student")
        .text("budgetMin", "300")
        .text("budgetMax", "not sure")
        .text("deadline", "2025-09-01")
        .text("datasetAvailable", "yes")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
