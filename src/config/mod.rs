//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the access token, catalog options, search tuning and retry policy.

mod error;

pub use error::ConfigError;

use crate::error::AppResult;
use crate::spotify::{RetryConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/spotify-albums-tui";

/// Largest page Spotify serves for search and library listings.
///
const MAX_PAGE_SIZE: u32 = 50;

/// Changes to persist, sent from the state to the config saver.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    AccessToken(Option<String>),
}

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: Option<String>,
    pub theme_name: String,
    pub market: String,
    pub include_groups: String,
    pub search_debounce_ms: u64,
    pub search_page_size: u32,
    pub saved_page_size: u32,
    pub request_timeout_secs: u64,
    pub api_base_url: String,
    pub retry: RetryConfig,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default = "default_include_groups")]
    pub include_groups: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
    #[serde(default = "default_saved_page_size")]
    pub saved_page_size: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_theme_name() -> String {
    "spotify-dark".to_string()
}

fn default_market() -> String {
    "US".to_string()
}

fn default_include_groups() -> String {
    "album,single".to_string()
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_search_page_size() -> u32 {
    20
}

fn default_saved_page_size() -> u32 {
    50
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance with default settings and no token.
    ///
    pub fn new() -> Config {
        Config {
            access_token: None,
            theme_name: default_theme_name(),
            market: default_market(),
            include_groups: default_include_groups(),
            search_debounce_ms: default_search_debounce_ms(),
            search_page_size: default_search_page_size(),
            saved_page_size: default_saved_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            api_base_url: default_api_base_url(),
            retry: RetryConfig::default(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place and
    /// the token unset, which the welcome screen handles.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> AppResult<()> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            self.apply(Config::parse(&contents)?);
            self.validate()?;
        }
        self.file_path = Some(file_path);

        Ok(())
    }

    fn parse(contents: &str) -> Result<FileSpec, ConfigError> {
        if contents.trim().is_empty() {
            return serde_yaml::from_str("{}")
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()));
        }
        serde_yaml::from_str(contents).map_err(|e| ConfigError::DeserializationFailed(e.to_string()))
    }

    /// Check settings against the limits of the Spotify endpoints.
    ///
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("search_page_size", self.search_page_size),
            ("saved_page_size", self.saved_page_size),
        ] {
            if !(1..=MAX_PAGE_SIZE).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("must be between 1 and {}", MAX_PAGE_SIZE),
                });
            }
        }
        if self.retry.backoff_factor < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_factor",
                message: "must be at least 1.0".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn apply(&mut self, data: FileSpec) {
        self.access_token = data.access_token.filter(|token| !token.trim().is_empty());
        self.theme_name = data.theme_name;
        self.market = data.market;
        self.include_groups = data.include_groups;
        self.search_debounce_ms = data.search_debounce_ms;
        self.search_page_size = data.search_page_size;
        self.saved_page_size = data.saved_page_size;
        self.request_timeout_secs = data.request_timeout_secs;
        self.api_base_url = data.api_base_url;
        self.retry = data.retry;
    }

    fn to_file_spec(&self) -> FileSpec {
        FileSpec {
            access_token: self.access_token.clone(),
            theme_name: self.theme_name.clone(),
            market: self.market.clone(),
            include_groups: self.include_groups.clone(),
            search_debounce_ms: self.search_debounce_ms,
            search_page_size: self.search_page_size,
            saved_page_size: self.saved_page_size,
            request_timeout_secs: self.request_timeout_secs,
            api_base_url: self.api_base_url.clone(),
            retry: self.retry.clone(),
        }
    }

    /// Serialize the current configuration and write it to disk.
    ///
    pub fn save(&self) -> AppResult<()> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = serde_yaml::to_string(&self.to_file_spec())
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Apply an update from the application and persist it.
    ///
    pub fn update(&mut self, update: ConfigUpdate) -> AppResult<()> {
        match update {
            ConfigUpdate::AccessToken(token) => self.access_token = token,
        }
        self.save()
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> AppResult<PathBuf> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(Path::new(DEFAULT_DIRECTORY_PATH))),
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "spotify-albums-tui-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn defaults_when_file_missing() {
        let dir = temp_dir("missing");
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert_eq!(config.access_token, None);
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.saved_page_size, 50);
        assert_eq!(config.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(config.retry, RetryConfig::default());
        assert!(dir.exists());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let spec = Config::parse("access_token: abc\nmarket: SE\nretry:\n  max_retries: 1\n").unwrap();
        let mut config = Config::new();
        config.apply(spec);
        assert_eq!(config.access_token.as_deref(), Some("abc"));
        assert_eq!(config.market, "SE");
        assert_eq!(config.include_groups, "album,single");
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let result = Config::parse("market: [unterminated");
        assert!(matches!(result, Err(ConfigError::DeserializationFailed(_))));
    }

    #[test]
    fn token_update_round_trips_through_disk() {
        let dir = temp_dir("roundtrip");
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        config
            .update(ConfigUpdate::AccessToken(Some("BQD-token".to_string())))
            .unwrap();

        let mut reloaded = Config::new();
        reloaded.load(dir.to_str()).unwrap();
        assert_eq!(reloaded.access_token.as_deref(), Some("BQD-token"));

        reloaded.update(ConfigUpdate::AccessToken(None)).unwrap();
        let mut cleared = Config::new();
        cleared.load(dir.to_str()).unwrap();
        assert_eq!(cleared.access_token, None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn out_of_range_page_size_is_rejected() {
        let mut config = Config::new();
        config.apply(Config::parse("saved_page_size: 80\n").unwrap());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "saved_page_size",
                ..
            })
        ));
        config.saved_page_size = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn save_without_path_fails() {
        let config = Config::new();
        assert!(config.save().is_err());
    }
}
