//! Start-up configuration read from `chat_config.ron`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chat_core::DEFAULT_GREETING;
use chat_engine::{BackendSettings, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "chat_config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// First AI message in the log; `None` starts with an empty log.
    pub greeting: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub max_response_bytes: u64,
    pub log_destination: LogDestination,
    /// File the values came from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            greeting: Some(DEFAULT_GREETING.to_string()),
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.map(|timeout| timeout.as_secs()),
            max_response_bytes: backend.max_response_bytes,
            log_destination: LogDestination::File,
            source: None,
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given (it must exist), otherwise `./chat_config.ron`
    /// when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILENAME), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let mut config: Self = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;
        config.validate()?;
        config.source = Some(path);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let parsed = url::Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(text.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let file = write_config(r#"(base_url: "https://chat.example.edu", request_timeout_secs: Some(30))"#);
        let config = AppConfig::load(Some(file.path())).expect("config loads");

        assert_eq!(config.base_url, "https://chat.example.edu");
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert_eq!(config.log_destination, LogDestination::File);
        assert_eq!(config.source.as_deref(), Some(file.path()));

        let settings = config.backend_settings();
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn greeting_can_be_disabled() {
        let file = write_config("(greeting: None, log_destination: Both)");
        let config = AppConfig::load(Some(file.path())).expect("config loads");
        assert_eq!(config.greeting, None);
        assert_eq!(config.log_destination, LogDestination::Both);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = AppConfig::load(Some(&dir.path().join("absent.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("(base_url: ");
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn base_url_must_be_http() {
        for url in ["localhost:8000", "ftp://example.com", "not a url"] {
            let file = write_config(&format!("(base_url: {url:?})"));
            let err = AppConfig::load(Some(file.path())).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidBaseUrl { .. }),
                "{url} gave {err}"
            );
        }
    }

    #[test]
    fn defaults_match_backend_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source, None);
        let settings = config.backend_settings();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.request_timeout, None);
    }
}
