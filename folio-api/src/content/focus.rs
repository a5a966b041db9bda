//! "Current focus" document
//!
//! Served verbatim from `<content_dir>/current-focus.json`, read on each
//! request. Without the file a compiled default is served.

use folio_common::{Error, Result};
use serde_json::{json, Value};
use std::path::Path;

pub const FOCUS_FILE: &str = "current-focus.json";

/// Document served when no file is present
pub fn default_focus() -> Value {
    json!({
        "headline": "Open for freelance work",
        "items": [
            { "label": "Building", "value": "Full-stack web applications" },
            { "label": "Learning", "value": "Systems programming" },
            { "label": "Available for", "value": "Student and small-business projects" }
        ],
        "updatedAt": null
    })
}

pub async fn load_current_focus(content_dir: &Path) -> Result<Value> {
    let path = content_dir.join(FOCUS_FILE);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(default_focus()),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&raw).map_err(|e| Error::Content {
        path,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let focus = load_current_focus(dir.path()).await.unwrap();
        assert_eq!(focus, default_focus());
    }

    #[tokio::test]
    async fn test_file_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FOCUS_FILE), r#"{"headline":"Writing a book"}"#).unwrap();
        let focus = load_current_focus(dir.path()).await.unwrap();
        assert_eq!(focus["headline"], "Writing a book");
    }

    #[tokio::test]
    async fn test_malformed_file_is_content_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FOCUS_FILE), "{ not json").unwrap();
        assert!(matches!(
            load_current_focus(dir.path()).await,
            Err(Error::Content { .. })
        ));
    }
}
