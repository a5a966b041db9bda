//! Inquiry persistence
//!
//! A row is inserted once per submission. The only later write attaches the
//! uploaded file URLs; rows are never deleted here.

use chrono::{NaiveDate, Utc};
use folio_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::validation::InquirySubmission;

/// Separator between URLs in the `file_urls` column
pub const FILE_URL_SEPARATOR: &str = ", ";

/// Stored inquiry row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InquiryRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub client_type: Option<String>,
    pub study_year: Option<String>,
    pub project_title: String,
    pub domain: Option<String>,
    pub details: String,
    pub dataset_available: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub file_urls: Option<String>,
    pub created_at: String,
}

impl InquiryRecord {
    /// `file_urls` split back into individual URLs
    pub fn file_url_list(&self) -> Vec<String> {
        self.file_urls
            .as_deref()
            .map(|joined| {
                joined
                    .split(FILE_URL_SEPARATOR)
                    .filter(|u| !u.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Insert a validated inquiry and return its generated id
pub async fn insert_inquiry(db: &SqlitePool, submission: &InquirySubmission) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO inquiries (
            id, name, email, phone, client_type, study_year, project_title,
            domain, details, dataset_available, budget_min, budget_max, deadline,
            created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&submission.name)
    .bind(&submission.email)
    .bind(&submission.phone)
    .bind(&submission.client_type)
    .bind(&submission.study_year)
    .bind(&submission.project_title)
    .bind(&submission.domain)
    .bind(&submission.details)
    .bind(submission.dataset_available.map(|d| d.as_str()))
    .bind(submission.budget_min)
    .bind(submission.budget_max)
    .bind(submission.deadline)
    .bind(&created_at)
    .execute(db)
    .await?;

    Ok(id)
}

/// Record uploaded file URLs on an existing inquiry
pub async fn attach_file_urls(db: &SqlitePool, id: &str, urls: &[String]) -> Result<()> {
    sqlx::query("UPDATE inquiries SET file_urls = ? WHERE id = ?")
        .bind(urls.join(FILE_URL_SEPARATOR))
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn get_inquiry(db: &SqlitePool, id: &str) -> Result<Option<InquiryRecord>> {
    let record = sqlx::query_as::<_, InquiryRecord>("SELECT * FROM inquiries WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::DatasetAvailability;
    use folio_common::db::init_database;

    fn submission() -> InquirySubmission {
        InquirySubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("+44 20 0000 0000".to_string()),
            client_type: Some("student".to_string()),
            study_year: Some("final".to_string()),
            project_title: "Engine notes".to_string(),
            domain: Some("computing".to_string()),
            details: "Annotate the analytical engine".to_string(),
            dataset_available: Some(DatasetAvailability::No),
            budget_min: Some(200),
            budget_max: Some(800),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 30),
        }
    }

    #[tokio::test]
    async fn test_insert_then_attach() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("t.db").display());
        let db = init_database(&url).await.unwrap();

        let id = insert_inquiry(&db, &submission()).await.unwrap();
        let record = get_inquiry(&db, &id).await.unwrap().unwrap();
        assert_eq!(record.project_title, "Engine notes");
        assert_eq!(record.dataset_available.as_deref(), Some("no"));
        assert_eq!(record.deadline, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert!(record.file_url_list().is_empty());

        let urls = vec!["https://b/1.pdf".to_string(), "https://b/2.png".to_string()];
        attach_file_urls(&db, &id, &urls).await.unwrap();
        let record = get_inquiry(&db, &id).await.unwrap().unwrap();
        assert_eq!(record.file_url_list(), urls);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("t.db").display());
        let db = init_database(&url).await.unwrap();

        let a = insert_inquiry(&db, &submission()).await.unwrap();
        let b = insert_inquiry(&db, &submission()).await.unwrap();
        assert_ne!(a, b);
        assert!(get_inquiry(&db, "missing").await.unwrap().is_none());
    }
}
