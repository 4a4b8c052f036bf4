//! Config file loading tests

use assert_matches::assert_matches;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

use chatlink::client::Config;
use chatlink::shared::{AppConfig, ConfigError};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
server_url = "https://chat.example.com/api/"
request_timeout_secs = 15
uploads_prefix = "https://cdn.example.com/uploads/"
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();

    assert_eq!(config.server_url, "https://chat.example.com/api");
    assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    assert_eq!(config.uploads_prefix, "https://cdn.example.com/uploads/");
    assert_eq!(config.default_avatar, AppConfig::default().default_avatar);
}

#[test]
fn test_client_config_builds_endpoint_urls() {
    let file = write_config(r#"server_url = "http://localhost:8800/api""#);

    let config = Config::from_app(AppConfig::from_file(file.path()).unwrap());

    assert_eq!(
        config.api_url("/relationship/pending"),
        "http://localhost:8800/api/relationship/pending"
    );
}

#[test]
fn test_unknown_key_rejected() {
    let file = write_config(r#"retries = 3"#);
    assert_matches!(AppConfig::from_file(file.path()), Err(ConfigError::Parse(_)));
}

#[test]
fn test_zero_timeout_rejected() {
    let file = write_config(r#"request_timeout_secs = 0"#);
    assert_matches!(AppConfig::from_file(file.path()), Err(ConfigError::InvalidTimeout));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    assert_matches!(Config::load(Some(missing.as_path())), Err(ConfigError::Io { .. }));
}
