// Local configuration file for Note Maker.
//
// Global config: `~/.notemaker/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DOC_TITLE: &str = "Note Maker Notes";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com";
const DEFAULT_DOCS_API_BASE: &str = "https://docs.googleapis.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root directory for Note Maker state: `~/.notemaker/`.
pub fn global_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".notemaker"))
}

/// Path to the config file: `~/.notemaker/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    global_dir().map(|d| d.join("config.toml"))
}

/// Configuration at `~/.notemaker/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NotemakerConfig {
    /// Title of the running notes document.
    pub doc_title: String,
    /// Directory listing page size.
    pub page_size: u32,
    /// Prefix prepended to page URLs (a forwarding/CORS proxy), if any.
    pub proxy_url: Option<String>,
    /// Base URL of the Drive API.
    pub drive_api_base: String,
    /// Base URL of the Docs API.
    pub docs_api_base: String,
    /// Per-request timeout for all HTTP calls.
    pub request_timeout_secs: u64,
}

impl Default for NotemakerConfig {
    fn default() -> Self {
        Self {
            doc_title: DEFAULT_DOC_TITLE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            proxy_url: None,
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            docs_api_base: DEFAULT_DOCS_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl NotemakerConfig {
    /// Load from `~/.notemaker/config.toml`. A missing file yields defaults;
    /// a file that exists but does not parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match global_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a specific path (creates parent directories).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Apply `NOTEMAKER_DOC_TITLE` and `NOTEMAKER_PROXY_URL` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(title) = non_empty_env("NOTEMAKER_DOC_TITLE") {
            self.doc_title = title;
        }
        if let Some(proxy) = non_empty_env("NOTEMAKER_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.doc_title.trim().is_empty() {
            return Err(ConfigError::Invalid("doc_title must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Serialize(e) => write!(f, "config serialize error: {e}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}
