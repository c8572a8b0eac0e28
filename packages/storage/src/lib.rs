#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persisted JSON documents for the F1 stats cache.
//!
//! Four documents live in a single per-user directory described by
//! [`StoragePaths`]:
//!
//! | File | Contents |
//! |---|---|
//! | `drivers_stats.json` | array of [`DriverStats`] |
//! | `race_schedule.json` | array of [`RaceScheduleEntry`] |
//! | `processed_races.json` | array of race names ([`ProcessedSet`]) |
//! | `driver_races.json` | [`DriverRaceIndex`] |
//!
//! Every write replaces the whole document. There is no locking between
//! concurrent writers.

pub mod json;
pub mod paths;
pub mod processed;

use std::path::{Path, PathBuf};

use f1_stats_aggregate_models::{DriverRaceIndex, DriverStats};
use f1_stats_api_models::RaceScheduleEntry;

pub use paths::StoragePaths;
pub use processed::ProcessedSet;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Document could not be encoded or decoded.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        /// Document involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Document is valid JSON but not in any accepted shape.
    #[error("malformed document {}: {message}", path.display())]
    Malformed {
        /// Document involved.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Typed access to the documents under a [`StoragePaths`] root.
#[derive(Debug, Clone)]
pub struct Storage {
    paths: StoragePaths,
}

impl Storage {
    #[must_use]
    pub const fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub const fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// The persisted race schedule, or `None` if it was never fetched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read.
    pub fn load_schedule(&self) -> Result<Option<Vec<RaceScheduleEntry>>, StorageError> {
        json::read_json(&self.paths.schedule_file())
    }

    /// Replaces the persisted race schedule.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be written.
    pub fn save_schedule(&self, schedule: &[RaceScheduleEntry]) -> Result<(), StorageError> {
        json::write_json(&self.paths.schedule_file(), schedule)
    }

    /// The processed-race set. A missing file is an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be read or is not in a
    /// recognised shape.
    pub fn load_processed(&self) -> Result<ProcessedSet, StorageError> {
        let path = self.paths.processed_file();
        match json::read_json::<serde_json::Value>(&path)? {
            Some(value) => ProcessedSet::from_json(&value, &path),
            None => Ok(ProcessedSet::new()),
        }
    }

    /// Replaces the processed-race set with its canonical flat form.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be written.
    pub fn save_processed(&self, processed: &ProcessedSet) -> Result<(), StorageError> {
        json::write_json(&self.paths.processed_file(), processed)
    }

    /// Creates an empty processed-race file unless one already exists.
    /// Returns `true` if a file was created.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be written.
    pub fn ensure_processed_file(&self) -> Result<bool, StorageError> {
        if self.paths.processed_file().exists() {
            return Ok(false);
        }
        self.save_processed(&ProcessedSet::new())?;
        Ok(true)
    }

    /// All persisted driver stats. A missing file is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read.
    pub fn load_stats(&self) -> Result<Vec<DriverStats>, StorageError> {
        Ok(json::read_json(&self.paths.stats_file())?.unwrap_or_default())
    }

    /// Stats for one driver, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read.
    pub fn load_driver_stats(&self, driver_id: &str) -> Result<Option<DriverStats>, StorageError> {
        Ok(self
            .load_stats()?
            .into_iter()
            .find(|stats| stats.driver_id() == driver_id))
    }

    /// Replaces the persisted driver stats.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be written.
    pub fn save_stats(&self, stats: &[DriverStats]) -> Result<(), StorageError> {
        json::write_json(&self.paths.stats_file(), stats)
    }

    /// The per-driver race index. A missing file is an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read.
    pub fn load_race_index(&self) -> Result<DriverRaceIndex, StorageError> {
        Ok(json::read_json(&self.paths.driver_races_file())?.unwrap_or_default())
    }

    /// Replaces the per-driver race index.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be written.
    pub fn save_race_index(&self, index: &DriverRaceIndex) -> Result<(), StorageError> {
        json::write_json(&self.paths.driver_races_file(), index)
    }
}
