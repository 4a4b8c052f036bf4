use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::Path;

/// Environment variable overriding the server URL
pub const API_URL_ENV: &str = "CHATLINK_API_URL";

/// Environment variable carrying the bearer token
pub const TOKEN_ENV: &str = "CHATLINK_TOKEN";

/// Client configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
    token: Option<String>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self::from_app(builder.build()?))
    }

    pub fn from_app(app: AppConfig) -> Self {
        Self { app, token: None }
    }

    /// Load the config file (if any) and apply environment overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let app = match path {
            Some(path) => AppConfig::from_file(path)?,
            None => match AppConfig::default_path() {
                Some(default) if default.exists() => AppConfig::from_file(default)?,
                _ => AppConfig::default(),
            },
        };

        let mut config = Self::from_app(app);
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let mut builder = AppConfig::builder()
                .server_url(url)
                .uploads_prefix(config.app.uploads_prefix.clone())
                .default_avatar(config.app.default_avatar.clone());
            if let Some(timeout) = config.app.request_timeout {
                builder = builder.request_timeout(timeout);
            }
            config.app = builder.build()?;
        }
        config.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Ok(config)
    }

    /// Set the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the bearer token
    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    /// Clear the token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}
