//! Database initialization
//!
//! Opens the datastore named by the connection string, creating the file and
//! its parent directory on first run, and creates the schema idempotently.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Open the database at `database_url` and create any missing tables
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let db_path = options.get_filename().to_path_buf();
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema_version_table(&pool).await?;
    create_inquiries_table(&pool).await?;
    create_contact_messages_table(&pool).await?;

    Ok(pool)
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the inquiries table
///
/// One row per service-inquiry submission. `file_urls` is the only column
/// written after insert.
pub async fn create_inquiries_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inquiries (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            client_type TEXT,
            study_year TEXT,
            project_title TEXT NOT NULL,
            domain TEXT,
            details TEXT NOT NULL,
            dataset_available TEXT CHECK (dataset_available IN ('yes', 'no', 'partial')),
            budget_min INTEGER,
            budget_max INTEGER,
            deadline TEXT,
            file_urls TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_inquiries_created_at ON inquiries(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the contact_messages table
pub async fn create_contact_messages_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contact_messages (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            subject TEXT,
            message TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_url(dir: &tempfile::TempDir, name: &str) -> String {
        format!("sqlite://{}", dir.path().join(name).display())
    }

    #[tokio::test]
    async fn test_database_created_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let url = db_url(&dir, "nested/folio.db");

        let pool = init_database(&url).await.expect("init should succeed");

        assert!(dir.path().join("nested/folio.db").exists());

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert!(tables.contains(&"inquiries".to_string()));
        assert!(tables.contains(&"contact_messages".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let url = db_url(&dir, "folio.db");

        let first = init_database(&url).await.unwrap();
        sqlx::query(
            "INSERT INTO contact_messages (id, name, email, message, created_at)
             VALUES ('a', 'Ada', 'ada@example.com', 'hello there friend', '2024-01-01T00:00:00Z')",
        )
        .execute(&first)
        .await
        .unwrap();
        first.close().await;

        let second = init_database(&url).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[tokio::test]
    async fn test_dataset_available_is_constrained() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&db_url(&dir, "folio.db")).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO inquiries (id, name, email, project_title, details, dataset_available, created_at)
             VALUES ('x', 'Ada', 'ada@example.com', 'Thesis', 'Some details here', 'maybe', 'now')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
