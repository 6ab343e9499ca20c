//! Application configuration
//!
//! Defaults, overlaid by `config.toml` in the data directory, overlaid by
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use docsentry_client::parse_base_url;

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:3002/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_API_URL: &str = "DOCSENTRY_API_URL";
pub const ENV_DATA_DIR: &str = "DOCSENTRY_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the API, including its path prefix
    pub api_url: String,
    /// Path to the database file
    pub database_path: PathBuf,
    pub request_timeout_secs: u64,
}

/// On-disk form; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    database_path: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            database_path: data_dir.join("docsentry.db"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn data_dir() -> PathBuf {
        directories::ProjectDirs::from("io", "DocSentry", "DocSentry")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".docsentry"))
    }

    /// Load using the environment: `DOCSENTRY_DATA_DIR` picks the data
    /// directory, `DOCSENTRY_API_URL` overrides the API URL.
    pub fn load() -> Result<Self> {
        let data_dir = std::env::var_os(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(Self::data_dir);

        let mut config = Self::load_from(&data_dir)?;
        if let Ok(api_url) = std::env::var(ENV_API_URL) {
            config.api_url = api_url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Defaults for `data_dir` overlaid with its `config.toml`, if present
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let mut config = Self::new(data_dir);
        let path = data_dir.join(CONFIG_FILE);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path)?;
        let file: ConfigFile = toml::from_str(&content)?;

        if let Some(api_url) = file.api_url {
            config.api_url = api_url;
        }
        if let Some(database_path) = file.database_path {
            config.database_path = if database_path.is_relative() {
                data_dir.join(database_path)
            } else {
                database_path
            };
        }
        if let Some(timeout) = file.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        parse_base_url(&self.api_url)
            .map_err(|e| CoreError::Config(format!("api_url: {}", e)))?;

        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(&Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.database_path, dir.path().join("docsentry.db"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_overlay() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "api_url = \"https://docsentry.example.com/api\"\ndatabase_path = \"state/app.db\"\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.api_url, "https://docsentry.example.com/api");
        assert_eq!(config.database_path, dir.path().join("state/app.db"));
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_malformed_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "api_url = 3\n").unwrap();
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(CoreError::ConfigFile(_))
        ));

        std::fs::write(dir.path().join(CONFIG_FILE), "homepage = \"x\"\n").unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path());

        config.api_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.api_url = DEFAULT_API_URL.to_string();
        config.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
