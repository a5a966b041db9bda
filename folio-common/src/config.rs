//! Configuration loading
//!
//! Values are resolved in layers, lowest priority first:
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables
//! 4. Command-line arguments (applied by the binary on top of [`Config::load`])
//!
//! Secrets (blob token, webhook URL, GitHub token) are never logged. Empty or
//! whitespace-only values count as unset at every layer.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";

/// Default cap on the combined size of files attached to one inquiry
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default blob store endpoint
pub const DEFAULT_BLOB_BASE_URL: &str = "https://blob.vercel-storage.com";

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,
    /// Datastore connection string
    pub database_url: String,
    /// Root of the content tree (`projects/`, `current-focus.json`)
    pub content_dir: PathBuf,
    /// Combined byte cap for files on one inquiry
    pub max_upload_bytes: usize,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
    pub blob: BlobConfig,
    pub slack: SlackConfig,
    pub github: GithubConfig,
}

/// Object storage settings
#[derive(Clone)]
pub struct BlobConfig {
    pub base_url: String,
    /// Write token; uploads are disabled without it
    pub token: Option<String>,
}

/// Chat webhook settings
#[derive(Clone, Default)]
pub struct SlackConfig {
    /// Incoming-webhook URL; notifications are disabled without it
    pub webhook_url: Option<String>,
}

/// GitHub proxy settings
#[derive(Clone)]
pub struct GithubConfig {
    pub username: Option<String>,
    pub token: Option<String>,
    pub api_base: String,
}

fn configured(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<configured>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for BlobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobConfig")
            .field("base_url", &self.base_url)
            .field("token", &configured(&self.token))
            .finish()
    }
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("webhook_url", &configured(&self.webhook_url))
            .finish()
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("username", &self.username)
            .field("token", &configured(&self.token))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// On-disk TOML layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    pub content_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    pub allowed_origins: Option<Vec<String>>,
    #[serde(default)]
    pub blob: TomlBlob,
    #[serde(default)]
    pub slack: TomlSlack,
    #[serde(default)]
    pub github: TomlGithub,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlBlob {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlSlack {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlGithub {
    pub username: Option<String>,
    pub token: Option<String>,
    pub api_base: Option<String>,
}

/// Trim a value and drop it when nothing is left
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Default database location under the platform data directory
fn default_database_url() -> String {
    let path = dirs::data_local_dir()
        .map(|d| d.join("folio").join("folio.db"))
        .unwrap_or_else(|| PathBuf::from("./folio.db"));
    format!("sqlite://{}", path.display())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: default_database_url(),
            content_dir: PathBuf::from("./content"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_origins: Vec::new(),
            blob: BlobConfig {
                base_url: DEFAULT_BLOB_BASE_URL.to_string(),
                token: None,
            },
            slack: SlackConfig::default(),
            github: GithubConfig {
                username: None,
                token: None,
                api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            },
        }
    }
}

impl Config {
    /// Load defaults, then the TOML file (if any), then the process environment
    ///
    /// `explicit_path` comes from the command line. An explicit path that does
    /// not exist is an error; a missing default-location file is not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        let env_path = non_empty(std::env::var(CONFIG_PATH_ENV).ok()).map(PathBuf::from);
        match resolve_config_path(explicit_path, env_path) {
            Some(path) => {
                let file = read_toml_config(&path)?;
                config.merge_toml(file);
                info!("Loaded config file: {}", path.display());
            }
            None => info!("No config file found, using defaults and environment"),
        }

        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values present in a parsed TOML file
    pub fn merge_toml(&mut self, file: TomlConfig) {
        if let Some(v) = non_empty(file.bind_addr) {
            self.bind_addr = v;
        }
        if let Some(v) = non_empty(file.database_url) {
            self.database_url = v;
        }
        if let Some(v) = file.content_dir {
            self.content_dir = v;
        }
        if let Some(v) = file.max_upload_bytes {
            self.max_upload_bytes = v;
        }
        if let Some(v) = file.allowed_origins {
            self.allowed_origins = v.into_iter().filter_map(|o| non_empty(Some(o))).collect();
        }
        if let Some(v) = non_empty(file.blob.base_url) {
            self.blob.base_url = v;
        }
        if let Some(v) = non_empty(file.blob.token) {
            self.blob.token = Some(v);
        }
        if let Some(v) = non_empty(file.slack.webhook_url) {
            self.slack.webhook_url = Some(v);
        }
        if let Some(v) = non_empty(file.github.username) {
            self.github.username = Some(v);
        }
        if let Some(v) = non_empty(file.github.token) {
            self.github.token = Some(v);
        }
        if let Some(v) = non_empty(file.github.api_base) {
            self.github.api_base = v;
        }
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        if let Some(v) = get("FOLIO_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = get("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = get("FOLIO_CONTENT_DIR") {
            self.content_dir = PathBuf::from(v);
        }
        if let Some(v) = get("FOLIO_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = v.parse().map_err(|e| {
                Error::Config(format!("FOLIO_MAX_UPLOAD_BYTES must be a byte count: {}", e))
            })?;
        }
        if let Some(v) = get("FOLIO_ALLOWED_ORIGINS") {
            self.allowed_origins = v
                .split(',')
                .filter_map(|o| non_empty(Some(o.to_string())))
                .collect();
        }
        if let Some(v) = get("BLOB_BASE_URL") {
            self.blob.base_url = v;
        }
        if let Some(v) = get("BLOB_READ_WRITE_TOKEN") {
            self.blob.token = Some(v);
        }
        if let Some(v) = get("SLACK_WEBHOOK_URL") {
            self.slack.webhook_url = Some(v);
        }
        if let Some(v) = get("GITHUB_USERNAME") {
            self.github.username = Some(v);
        }
        if let Some(v) = get("GITHUB_TOKEN") {
            self.github.token = Some(v);
        }
        if let Some(v) = get("GITHUB_API_BASE") {
            self.github.api_base = v;
        }
        Ok(())
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<()> {
        self.bind_addr.parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!("Invalid bind address '{}': {}", self.bind_addr, e))
        })?;
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than zero".to_string()));
        }
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("database_url is empty".to_string()));
        }
        Ok(())
    }

    /// Log the effective configuration without revealing secrets
    pub fn log_summary(&self) {
        info!("Bind address: {}", self.bind_addr);
        info!("Content directory: {}", self.content_dir.display());
        info!("Max upload size: {} bytes", self.max_upload_bytes);
        info!("Blob uploads: {}", if self.blob.token.is_some() { "enabled" } else { "disabled" });
        info!(
            "Webhook notifications: {}",
            if self.slack.webhook_url.is_some() { "enabled" } else { "disabled" }
        );
        match &self.github.username {
            Some(user) => info!(
                "GitHub stats proxy: {} (token {})",
                user,
                if self.github.token.is_some() { "set" } else { "not set" }
            ),
            None => warn!("GitHub stats proxy disabled (no GITHUB_USERNAME)"),
        }
    }
}

/// Pick the config file to read
///
/// Priority: explicit path, then the `FOLIO_CONFIG` value, then
/// `<config_dir>/folio/config.toml` when that file exists.
pub fn resolve_config_path(explicit: Option<&Path>, env_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path {
        return Some(path);
    }
    dirs::config_dir()
        .map(|d| d.join("folio").join("config.toml"))
        .filter(|p| p.exists())
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    Ok(toml::from_str(&content)?)
}
