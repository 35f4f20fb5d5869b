//! Start-up configuration.
//!
//! Read from `config.toml` in the platform config directory, then
//! overridden by `EVENT_CALENDAR_DATA` and `EVENT_CALENDAR_LOG`.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::theme::ThemeConfig;

const APP_DIR: &str = "event-calendar";
const DATA_FILE: &str = "events.json";
const LOG_FILE: &str = "event-calendar.log";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where the event list is persisted.
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    data_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    #[serde(flatten)]
    theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        let dir = data_dir();
        Self {
            data_file: dir.join(DATA_FILE),
            log_file: dir.join(LOG_FILE),
            log_filter: DEFAULT_LOG_LEVEL.to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file if present and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                        path: path.clone(),
                        source,
                    })?;
                Self::from_toml_str(&content).map_err(|source| ConfigError::Parse { path, source })?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Self {
            data_file: file.data_file.unwrap_or(defaults.data_file),
            log_file: file.log_file.unwrap_or(defaults.log_file),
            log_filter: file.log_level.unwrap_or(defaults.log_filter),
            theme: file.theme,
        })
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("EVENT_CALENDAR_DATA").filter(|v| !v.trim().is_empty()) {
            self.data_file = PathBuf::from(path);
        }
        if let Some(filter) = lookup("EVENT_CALENDAR_LOG").filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
