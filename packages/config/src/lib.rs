#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Settings for the F1 stats pipeline.
//!
//! Values are resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults.
//! 2. A TOML file: the path passed to [`Settings::load`], else
//!    `$F1_STATS_CONFIG`, else `config.toml` inside the default storage
//!    directory if it exists.
//! 3. Environment variables `F1_STATS_BASE_URL`, `F1_STATS_SEASON` and
//!    `F1_STATS_DATA_DIR`.
//!
//! ```toml
//! base_url = "https://api.jolpi.ca/ergast/f1"
//! season = 2025
//! data_dir = "/home/me/.local/share/F1App"
//!
//! [http]
//! timeout_secs = 10
//! max_attempts = 3
//! retry_delay_ms = 2000
//!
//! [throttle]
//! page_size = 100
//! page_delay_ms = 200
//! driver_delay_ms = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use f1_stats_aggregate::RunOptions;
use f1_stats_api::{ClientOptions, PageOptions, RetryPolicy};
use f1_stats_storage::StoragePaths;
use f1_stats_storage::paths::APP_DIR_NAME;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "F1_STATS_CONFIG";
pub const BASE_URL_ENV: &str = "F1_STATS_BASE_URL";
pub const SEASON_ENV: &str = "F1_STATS_SEASON";
pub const DATA_DIR_ENV: &str = "F1_STATS_DATA_DIR";

/// Name of the config file looked up in the storage directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Settings`].
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be interpreted.
    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    /// No data directory was configured and the platform has none.
    #[error("no data directory available; set {DATA_DIR_ENV}")]
    NoDataDir,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// API base URL.
    pub base_url: String,
    /// Season whose roster and schedule are tracked.
    pub season: i32,
    /// Storage directory. `None` means the platform default.
    pub data_dir: Option<PathBuf>,
    pub http: HttpSettings,
    pub throttle: ThrottleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: f1_stats_api::DEFAULT_BASE_URL.to_owned(),
            season: f1_stats_aggregate::DEFAULT_SEASON,
            data_dir: None,
            http: HttpSettings::default(),
            throttle: ThrottleSettings::default(),
        }
    }
}

/// `[http]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

/// `[throttle]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThrottleSettings {
    pub page_size: u32,
    pub page_delay_ms: u64,
    pub driver_delay_ms: u64,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            page_delay_ms: 200,
            driver_delay_ms: 500,
        }
    }
}

impl Settings {
    /// Resolves settings from the file at `config_path` (or the default
    /// lookup) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicitly named config file is
    /// missing or invalid, or an environment override cannot be parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// Like [`Settings::load`] but reads environment variables through
    /// `env`.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_with(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let explicit = config_path
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let mut settings = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match default_data_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        settings.apply_env(env)?;
        Ok(settings)
    }

    /// Parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading settings from {}", path.display());
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `F1_STATS_SEASON` is not an
    /// integer.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(base_url) = env(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(season) = env(SEASON_ENV) {
            self.season = season.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: SEASON_ENV,
                value: season,
            })?;
        }
        if let Some(data_dir) = env(DATA_DIR_ENV) {
            self.data_dir = Some(PathBuf::from(data_dir));
        }
        Ok(())
    }

    /// The storage directory: the configured one, else
    /// `<platform data dir>/F1App`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoDataDir`] if neither is available.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        self.data_dir
            .clone()
            .or_else(default_data_dir)
            .ok_or(ConfigError::NoDataDir)
    }

    /// Paths of the persisted documents.
    ///
    /// # Errors
    ///
    /// See [`Settings::data_dir`].
    pub fn storage_paths(&self) -> Result<StoragePaths, ConfigError> {
        self.data_dir().map(StoragePaths::new)
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.http.timeout_secs),
            retry: RetryPolicy {
                max_attempts: self.http.max_attempts,
                delay: Duration::from_millis(self.http.retry_delay_ms),
            },
        }
    }

    #[must_use]
    pub const fn page_options(&self) -> PageOptions {
        PageOptions {
            page_size: self.throttle.page_size,
            delay: Duration::from_millis(self.throttle.page_delay_ms),
        }
    }

    #[must_use]
    pub const fn run_options(&self) -> RunOptions {
        RunOptions {
            season: self.season,
            pages: self.page_options(),
            driver_delay: Duration::from_millis(self.throttle.driver_delay_ms),
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}
