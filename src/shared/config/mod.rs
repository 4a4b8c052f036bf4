//! Application configuration module
//!
//! Provides configuration types for the client, loadable from a TOML file.
//!
//! ```toml
//! server_url = "https://chat.example.com/api"
//! request_timeout_secs = 10
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8800/api";

/// Where uploaded profile images are served from
pub const DEFAULT_UPLOADS_PREFIX: &str = "/uploads/";

/// Avatar shown for users without a profile image
pub const DEFAULT_AVATAR: &str = "/assets/NoUserImage.png";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Server URL, including any path prefix the API is mounted on
    pub server_url: String,
    /// Per-request timeout; `None` leaves reqwest's default (no timeout)
    pub request_timeout: Option<Duration>,
    /// Prefix prepended to profile image references
    pub uploads_prefix: String,
    /// Placeholder avatar reference
    pub default_avatar: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: None,
            uploads_prefix: DEFAULT_UPLOADS_PREFIX.to_string(),
            default_avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingValue("server_url"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatlink").join("config.toml"))
    }

    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.into_builder().build()
    }
}

/// On-disk shape of the config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    uploads_prefix: Option<String>,
    default_avatar: Option<String>,
}

impl ConfigFile {
    fn into_builder(self) -> AppConfigBuilder {
        AppConfigBuilder {
            server_url: self.server_url,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            uploads_prefix: self.uploads_prefix,
            default_avatar: self.default_avatar,
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    request_timeout: Option<Duration>,
    uploads_prefix: Option<String>,
    default_avatar: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn uploads_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.uploads_prefix = Some(prefix.into());
        self
    }

    pub fn default_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.default_avatar = Some(avatar.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            request_timeout: self.request_timeout,
            uploads_prefix: self.uploads_prefix.unwrap_or(defaults.uploads_prefix),
            default_avatar: self.default_avatar.unwrap_or(defaults.default_avatar),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("request timeout must be greater than zero")]
    InvalidTimeout,
    #[error("failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}
