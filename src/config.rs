//! Client configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `NOVA__*` environment variables (e.g. `NOVA__API_URL`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogLevel;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "NOVA";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The path is not valid UTF-8
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Source(#[from] ::config::ConfigError),

    /// A value was read but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything needed to build a [`Client`](crate::client::Client).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Backend origin. Requests go to `{api_url}/api/...`.
    pub api_url: String,
    /// Directory holding the persisted session.
    pub storage_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: default_storage_dir(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: LogLevel::Info,
        }
    }
}

/// `<data_dir>/shadow-nova`, or `./.shadow-nova` where the platform has no
/// data directory.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("shadow-nova"))
        .unwrap_or_else(|| PathBuf::from(".shadow-nova"))
}

impl ClientConfig {
    /// Load defaults, then `path` if given, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is given but missing or unparsable, or if
    /// the merged values are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(path, None)
    }

    /// Like [`load`](Self::load), reading overrides from `env` instead of the
    /// process environment. Keys look like `NOVA__API_URL`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        Self::build(path, Some(env))
    }

    fn build(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default(
                "storage_dir",
                defaults.storage_dir.to_string_lossy().into_owned(),
            )?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("log_level", defaults.log_level.as_str())?;

        if let Some(path) = path {
            let path_str = path
                .to_str()
                .ok_or_else(|| ConfigError::InvalidPath(format!("{:?}", path)))?;
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path_str.to_string()));
            }
            builder = builder.add_source(File::new(path_str, FileFormat::Toml));
        }

        // Double underscore separates nested keys; single ones stay in names
        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(env);

        let config: ClientConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;

        tracing::debug!(api_url = %config.api_url, storage_dir = %config.storage_dir.display(), "configuration loaded");
        Ok(config)
    }

    /// Replace the backend URL, keeping the result valid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `api_url` is not an http(s) URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_url = api_url.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::load_with_env(None, no_env()).unwrap();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.storage_dir.ends_with("shadow-nova"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "{}",
            toml::toml! {
                api_url = "https://api.example.com"
                request_timeout_secs = 5
                log_level = "debug"
            }
        )
        .unwrap();

        let config = ClientConfig::load_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"https://file.example.com\"").unwrap();

        let config = ClientConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("NOVA__API_URL", "https://env.example.com"),
                ("NOVA__REQUEST_TIMEOUT_SECS", "12"),
                ("NOVA__STORAGE_DIR", "/tmp/nova-test"),
                ("NOVA__LOG_LEVEL", "warn"),
                ("OTHER__API_URL", "ignored"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_url, "https://env.example.com");
        assert_eq!(config.request_timeout_secs, 12);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/nova-test"));
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_missing_file() {
        let result = ClientConfig::load_with_env(Some(Path::new("/nonexistent/nova.toml")), no_env());
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_rejects_bad_url() {
        let result = ClientConfig::load_with_env(None, env(&[("NOVA__API_URL", "localhost")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result =
            ClientConfig::load_with_env(None, env(&[("NOVA__REQUEST_TIMEOUT_SECS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_with_api_url_validates() {
        let config = ClientConfig::load_with_env(None, no_env()).unwrap();

        let overridden = config.clone().with_api_url("https://api.example.com").unwrap();
        assert_eq!(overridden.api_url, "https://api.example.com");

        let result = config.with_api_url("localhost");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
