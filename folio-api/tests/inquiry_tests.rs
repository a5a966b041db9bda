//! Integration tests for the service-inquiry pipeline
//!
//! Tests cover:
//! - Field-level validation errors
//! - Persist-then-upload-then-notify ordering and partial-failure tolerance
//! - Attachment count and size limits
//! - Datastore failure surfacing as a server error

mod helpers;

use axum::http::StatusCode;
use folio_api::db::get_inquiry;
use folio_api::services::Notification;
use folio_api::{build_router, AppState};
use helpers::{extract_json, valid_inquiry_form, FakeBlobStore, FakeNotifier, MultipartBuilder, TestContext};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: Router wired to the given fakes
fn setup_app(
    ctx: &TestContext,
    blob: Arc<FakeBlobStore>,
    notifier: Arc<FakeNotifier>,
) -> axum::Router {
    let state = AppState::new(ctx.db.clone(), &ctx.content_dir)
        .with_blob_store(blob)
        .with_notifier(notifier);
    build_router(state)
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_required_field_is_named() {
    let ctx = TestContext::new().await;
    let notifier = Arc::new(FakeNotifier::default());
    let app = setup_app(&ctx, Arc::new(FakeBlobStore::default()), notifier.clone());

    let request = MultipartBuilder::new()
        .text("name", "Ada Lovelace")
        .text("email", "ada@example.com")
        .text("details", "Help me annotate the Bernoulli number program.")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["project_title"]);

    assert_eq!(ctx.count("inquiries").await, 0);
    assert_eq!(notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_invalid_email_and_short_details() {
    let ctx = TestContext::new().await;
    let app = setup_app(&ctx, Arc::default(), Arc::default());

    let request = MultipartBuilder::new()
        .text("name", "Ada Lovelace")
        .text("email", "ada-at-example")
        .text("project_title", "Notes")
        .text("details", "too short")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "email");
    assert_eq!(errors[1]["field"], "details");
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn test_valid_submission_returns_id() {
    let ctx = TestContext::new().await;
    let blob = Arc::new(FakeBlobStore::default());
    let notifier = Arc::new(FakeNotifier::default());
    let app = setup_app(&ctx, blob.clone(), notifier.clone());

    let response = app
        .oneshot(valid_inquiry_form().into_request("/api/inquiries"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("received"));
    let id = body["id"].as_str().unwrap().to_string();

    let record = get_inquiry(&ctx.db, &id).await.unwrap().expect("row stored");
    assert_eq!(record.project_title, "Analytical engine notes");
    assert_eq!(record.client_type.as_deref(), Some("student"));
    assert_eq!(record.budget_min, Some(300));
    assert_eq!(record.budget_max, None);
    assert_eq!(record.dataset_available.as_deref(), Some("yes"));
    assert!(record.file_urls.is_none());

    assert_eq!(blob.upload_count(), 0);
    assert_eq!(notifier.sent_count(), 1);
}

#[tokio::test]
async fn test_files_uploaded_and_recorded() {
    let ctx = TestContext::new().await;
    let blob = Arc::new(FakeBlobStore::default());
    let notifier = Arc::new(FakeNotifier::default());
    let app = setup_app(&ctx, blob.clone(), notifier.clone());

    let request = valid_inquiry_form()
        .file("files", "brief.pdf", "application/pdf", b"%PDF-1.4 brief")
        .file("files", "my data.csv", "text/csv", b"a,b\n1,2\n")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let id = extract_json(response.into_body()).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let record = get_inquiry(&ctx.db, &id).await.unwrap().unwrap();
    assert_eq!(
        record.file_url_list(),
        vec![
            format!("https://blob.test/inquiries/{}/brief.pdf", id),
            format!("https://blob.test/inquiries/{}/my-data.csv", id),
        ]
    );

    let uploads = blob.uploads.lock().unwrap();
    assert_eq!(uploads[0].1, "application/pdf");
    assert_eq!(uploads[1].2, 8);

    let sent = notifier.sent.lock().unwrap();
    match &sent[0] {
        Notification::Inquiry { file_urls, .. } => assert_eq!(file_urls.len(), 2),
        other => panic!("unexpected notification {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_file_input_ignored() {
    let ctx = TestContext::new().await;
    let blob = Arc::new(FakeBlobStore::default());
    let app = setup_app(&ctx, blob.clone(), Arc::default());

    let request = valid_inquiry_form()
        .file("files", "", "application/octet-stream", b"")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(blob.upload_count(), 0);
}

// =============================================================================
// Partial failure tolerance
// =============================================================================

#[tokio::test]
async fn test_unreachable_blob_store_still_succeeds() {
    let ctx = TestContext::new().await;
    let notifier = Arc::new(FakeNotifier::default());
    let app = setup_app(&ctx, Arc::new(FakeBlobStore::failing()), notifier.clone());

    let request = valid_inquiry_form()
        .file("files", "brief.pdf", "application/pdf", b"%PDF-1.4")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let id = extract_json(response.into_body()).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let record = get_inquiry(&ctx.db, &id).await.unwrap().unwrap();
    assert!(record.file_urls.is_none());
    assert!(record.file_url_list().is_empty());
    assert_eq!(notifier.sent_count(), 1);
}

#[tokio::test]
async fn test_unreachable_webhook_still_succeeds() {
    let ctx = TestContext::new().await;
    let notifier = Arc::new(FakeNotifier::failing());
    let app = setup_app(&ctx, Arc::default(), notifier.clone());

    let response = app
        .oneshot(valid_inquiry_form().into_request("/api/inquiries"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert!(body["id"].is_string());
    assert_eq!(notifier.sent_count(), 1);
    assert_eq!(ctx.count("inquiries").await, 1);
}

#[tokio::test]
async fn test_default_state_without_collaborators_succeeds() {
    let ctx = TestContext::new().await;
    let app = build_router(AppState::new(ctx.db.clone(), &ctx.content_dir));

    let request = valid_inquiry_form()
        .file("files", "brief.pdf", "application/pdf", b"%PDF-1.4")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(ctx.count("inquiries").await, 1);
}

#[tokio::test]
async fn test_datastore_failure_is_server_error() {
    let ctx = TestContext::new().await;
    let blob = Arc::new(FakeBlobStore::default());
    let notifier = Arc::new(FakeNotifier::default());
    let app = setup_app(&ctx, blob.clone(), notifier.clone());

    ctx.db.close().await;

    let request = valid_inquiry_form()
        .file("files", "brief.pdf", "application/pdf", b"%PDF-1.4")
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");

    // Nothing downstream runs without a stored row
    assert_eq!(blob.upload_count(), 0);
    assert_eq!(notifier.sent_count(), 0);
}

// =============================================================================
// Attachment limits
// =============================================================================

#[tokio::test]
async fn test_more_than_five_files_rejected() {
    let ctx = TestContext::new().await;
    let blob = Arc::new(FakeBlobStore::default());
    let app = setup_app(&ctx, blob.clone(), Arc::default());

    let mut form = valid_inquiry_form();
    for i in 0..6 {
        form = form.file("files", &format!("f{}.txt", i), "text/plain", b"x");
    }
    let response = app.oneshot(form.into_request("/api/inquiries")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("At most 5 files"));
    assert_eq!(ctx.count("inquiries").await, 0);
    assert_eq!(blob.upload_count(), 0);
}

#[tokio::test]
async fn test_combined_size_cap() {
    let ctx = TestContext::new().await;
    let state = AppState::new(ctx.db.clone(), &ctx.content_dir).with_max_upload_bytes(16);
    let app = build_router(state);

    let request = valid_inquiry_form()
        .file("files", "a.bin", "application/octet-stream", &[0u8; 10])
        .file("files", "b.bin", "application/octet-stream", &[0u8; 10])
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("byte limit"));
    assert_eq!(ctx.count("inquiries").await, 0);
}

#[tokio::test]
async fn test_not_multipart_is_client_error() {
    let ctx = TestContext::new().await;
    let app = setup_app(&ctx, Arc::default(), Arc::default());

    let response = app
        .oneshot(helpers::post_json("/api/inquiries", r#"{"name":"Ada"}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_body_over_route_limit_is_payload_too_large() {
    let ctx = TestContext::new().await;
    let blob = Arc::new(FakeBlobStore::default());
    let state = AppState::new(ctx.db.clone(), &ctx.content_dir)
        .with_blob_store(blob.clone())
        .with_max_upload_bytes(16);
    let app = build_router(state);

    // Route limit is the upload cap plus 1 MiB of form overhead
    let oversized = vec![0u8; 2 * 1024 * 1024];
    let request = valid_inquiry_form()
        .file("files", "huge.bin", "application/octet-stream", &oversized)
        .into_request("/api/inquiries");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(ctx.count("inquiries").await, 0);
    assert_eq!(blob.upload_count(), 0);
}
