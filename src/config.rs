//! Configuration file parser for ~/.config/lexfeed/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged as likely typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::api::FeedKind;
use crate::theme::ThemeVariant;
use crate::util::{validate_base_url, BaseUrlError};

/// Backend used when neither flag, environment nor config names one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable consulted for the backend base URL.
pub const API_URL_ENV: &str = "LEXFEED_API_URL";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid api_url in config file: {0}")]
    InvalidApiUrl(#[source] BaseUrlError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL. Overridden by `--api-url` and `LEXFEED_API_URL`.
    pub api_url: Option<String>,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// View shown at startup ("blogs" or "community").
    pub start_view: String,

    /// Upper bound on each HTTP exchange.
    pub request_timeout_secs: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            theme: "dark".to_string(),
            start_view: "community".to_string(),
            request_timeout_secs: 30,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "api_url",
        "theme",
        "start_view",
        "request_timeout_secs",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - `api_url` that is not an absolute http(s) URL → `Err(ConfigError::InvalidApiUrl)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        if let Some(url) = &config.api_url {
            validate_base_url(url).map_err(ConfigError::InvalidApiUrl)?;
        }

        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            start_view = %config.start_view,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Configured theme, falling back to Dark for unknown names.
    pub fn theme_variant(&self) -> ThemeVariant {
        ThemeVariant::from_str_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        })
    }

    /// Configured start view, falling back to the community forum.
    pub fn start_view(&self) -> FeedKind {
        FeedKind::from_str_name(&self.start_view).unwrap_or_else(|| {
            tracing::warn!(start_view = %self.start_view, "Unknown start_view, using community");
            FeedKind::Community
        })
    }

    /// Request timeout; zero is treated as one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Picks the backend base URL: flag, then environment, then config, then default.
    ///
    /// Empty strings are skipped at every level. The winner is not validated
    /// here; `ApiClient::new` does that.
    pub fn resolve_api_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        [flag, env, self.api_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(test_name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lexfeed_config_test_{test_name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.start_view(), FeedKind::Community);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.api_url.is_none());
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/lexfeed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.start_view, "community");
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let path = write_config(
            "full",
            r#"
api_url = "https://legal.example.com"
theme = "light"
start_view = "blogs"
request_timeout_secs = 10

[keybindings]
reload = "F5"
new_post = "Ctrl+n"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://legal.example.com"));
        assert_eq!(config.theme_variant(), ThemeVariant::Light);
        assert_eq!(config.start_view(), FeedKind::Blogs);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.keybindings.get("reload").map(String::as_str),
            Some("F5")
        );
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_invalid_api_url_rejected() {
        let path = write_config("bad_url", "api_url = \"ftp://legal.example.com\"\n");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl(_)));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "theme = \"dark\"\nrefresh_interval = 5\n");
        assert!(Config::load(&path).is_ok());
        cleanup(&path);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let path = write_config("wrong_type", "request_timeout_secs = \"soon\"\n");
        assert!(Config::load(&path).is_err());
        cleanup(&path);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_theme_and_view_fall_back() {
        let config = Config {
            theme: "solarized".to_string(),
            start_view: "news".to_string(),
            ..Config::default()
        };
        assert_eq!(config.theme_variant(), ThemeVariant::Dark);
        assert_eq!(config.start_view(), FeedKind::Community);
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_api_url_precedence() {
        let config = Config {
            api_url: Some("http://from-config:1".to_string()),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_api_url(Some("http://from-flag:1"), Some("http://from-env:1")),
            "http://from-flag:1"
        );
        assert_eq!(
            config.resolve_api_url(None, Some("http://from-env:1")),
            "http://from-env:1"
        );
        assert_eq!(config.resolve_api_url(Some(""), Some("  ")), "http://from-config:1");
        assert_eq!(
            Config::default().resolve_api_url(None, None),
            DEFAULT_API_URL
        );
    }
}
