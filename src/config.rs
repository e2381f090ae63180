//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The file is optional: a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
//! Environment variables override the file; CLI flags override both (see `main`).
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::listing::PAGE_SIZE;
use crate::store::DEFAULT_BULK_PAGE_SIZE;

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "NEWSDESK_BASE_URL";
/// Overrides `api_token`.
pub const ENV_TOKEN: &str = "NEWSDESK_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file is too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Console configuration. Any subset of keys may be given.
///
/// `password` and `api_token` are masked in `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API root, e.g. `http://localhost:8888/api`.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Rows per listing page.
    pub page_size: usize,

    /// Page size requested when loading a whole paged collection.
    pub bulk_page_size: u32,

    /// Credentials for logging in at startup.
    pub username: Option<String>,
    pub password: Option<String>,

    /// Pre-issued bearer token; skips the login call when set.
    pub api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            page_size: PAGE_SIZE,
            bulk_page_size: DEFAULT_BULK_PAGE_SIZE,
            username: None,
            password: None,
            api_token: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("page_size", &self.page_size)
            .field("bulk_page_size", &self.bulk_page_size)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "base_url",
        "request_timeout_secs",
        "page_size",
        "bulk_page_size",
        "username",
        "password",
        "api_token",
    ];

    /// Default location: `~/.config/newsdesk/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("newsdesk")
                .join("config.toml"),
        )
    }

    /// Read and parse the file at `path`.
    ///
    /// A file that does not exist gives the defaults, as does one holding only
    /// whitespace. Files over 1 MB are refused without being parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file absent, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        // Read one byte past the cap so an oversized file is detected even if
        // it grew after being opened.
        let mut content = String::new();
        file.take(Self::MAX_FILE_SIZE + 1)
            .read_to_string(&mut content)?;
        if content.len() as u64 > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} exceeds {} bytes",
                path.display(),
                Self::MAX_FILE_SIZE
            )));
        }

        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Parse TOML text. Blank text yields the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(table) = content.parse::<toml::Table>() {
            table
                .keys()
                .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
                .for_each(|key| tracing::warn!(key = %key, "Ignoring unknown config key"));
        }

        Ok(toml::from_str(content)?)
    }

    /// Apply `NEWSDESK_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Blank values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_blank(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(token) = non_blank(ENV_TOKEN) {
            self.api_token = Some(token);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Username and password, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
