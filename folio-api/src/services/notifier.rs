//! Chat-webhook notifications for new submissions
//!
//! Notifications are sent after the submission is persisted and never affect
//! the response: callers log a failure and move on.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::validation::{ContactSubmission, InquirySubmission};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Characters of the free-text body quoted in a notification
const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Network(String),

    #[error("Webhook returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// A message announcing one stored submission
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Inquiry {
        id: String,
        name: String,
        email: String,
        project_title: String,
        client_type: Option<String>,
        budget_min: Option<i64>,
        budget_max: Option<i64>,
        deadline: Option<NaiveDate>,
        details_preview: String,
        file_urls: Vec<String>,
    },
    Contact {
        id: String,
        name: String,
        email: String,
        subject: Option<String>,
        message_preview: String,
    },
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}

fn budget_label(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{} – {}", lo, hi),
        (Some(lo), None) => format!("from {}", lo),
        (None, Some(hi)) => format!("up to {}", hi),
        (None, None) => "not specified".to_string(),
    }
}

fn field(label: &str, value: &str) -> Value {
    json!({ "type": "mrkdwn", "text": format!("*{}:*\n{}", label, value) })
}

impl Notification {
    pub fn inquiry(id: &str, submission: &InquirySubmission, file_urls: &[String]) -> Self {
        Notification::Inquiry {
            id: id.to_string(),
            name: submission.name.clone(),
            email: submission.email.clone(),
            project_title: submission.project_title.clone(),
            client_type: submission.client_type.clone(),
            budget_min: submission.budget_min,
            budget_max: submission.budget_max,
            deadline: submission.deadline,
            details_preview: preview(&submission.details),
            file_urls: file_urls.to_vec(),
        }
    }

    pub fn contact(id: &str, submission: &ContactSubmission) -> Self {
        Notification::Contact {
            id: id.to_string(),
            name: submission.name.clone(),
            email: submission.email.clone(),
            subject: submission.subject.clone(),
            message_preview: preview(&submission.message),
        }
    }

    /// One-line summary, also used as the webhook fallback text
    pub fn summary(&self) -> String {
        match self {
            Notification::Inquiry {
                name,
                project_title,
                ..
            } => format!("New service inquiry from {}: {}", name, project_title),
            Notification::Contact { name, subject, .. } => match subject {
                Some(subject) => format!("New contact message from {}: {}", name, subject),
                None => format!("New contact message from {}", name),
            },
        }
    }

    /// Slack-compatible `{text, blocks}` payload
    pub fn to_webhook_payload(&self) -> Value {
        let header = json!({
            "type": "header",
            "text": { "type": "plain_text", "text": self.summary() }
        });

        let (fields, body, id) = match self {
            Notification::Inquiry {
                id,
                email,
                client_type,
                budget_min,
                budget_max,
                deadline,
                details_preview,
                file_urls,
                ..
            } => {
                let mut fields = vec![
                    field("Email", email),
                    field("Client type", client_type.as_deref().unwrap_or("not specified")),
                    field("Budget", &budget_label(*budget_min, *budget_max)),
                    field(
                        "Deadline",
                        &deadline
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "none".to_string()),
                    ),
                ];
                if !file_urls.is_empty() {
                    fields.push(field("Files", &file_urls.join("\n")));
                }
                (fields, details_preview, id)
            }
            Notification::Contact {
                id,
                email,
                message_preview,
                ..
            } => (vec![field("Email", email)], message_preview, id),
        };

        json!({
            "text": self.summary(),
            "blocks": [
                header,
                { "type": "section", "fields": fields },
                { "type": "section", "text": { "type": "mrkdwn", "text": body } },
                {
                    "type": "context",
                    "elements": [{ "type": "mrkdwn", "text": format!("id `{}`", id) }]
                }
            ]
        })
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Posts notifications to a Slack incoming webhook
pub struct SlackNotifier {
    http_client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: &str) -> Result<Self, NotifyError> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            webhook_url: webhook_url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&notification.to_webhook_payload())
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Stand-in used when no webhook URL is configured
#[derive(Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        debug!("Webhook disabled, dropping notification: {}", notification.summary());
        Ok(())
    }
}
