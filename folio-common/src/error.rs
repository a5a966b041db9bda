//! Common error types for folio

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for folio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the folio crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Content file with a missing or malformed frontmatter block
    #[error("Invalid content file {}: {message}", path.display())]
    Content { path: PathBuf, message: String },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
