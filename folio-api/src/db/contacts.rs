//! Contact message persistence

use chrono::Utc;
use folio_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::validation::ContactSubmission;

/// Insert a validated contact message and return its generated id
pub async fn insert_contact_message(db: &SqlitePool, message: &ContactSubmission) -> Result<String> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO contact_messages (id, name, email, subject, message, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&message.name)
    .bind(&message.email)
    .bind(&message.subject)
    .bind(&message.message)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await?;

    Ok(id)
}
