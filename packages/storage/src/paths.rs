#![allow(clippy::module_name_repetitions)]
//! Canonical file paths inside the storage directory.
//!
//! Nothing here touches the filesystem on construction; call
//! [`StoragePaths::ensure_root`] before the first write.

use std::path::{Path, PathBuf};

/// Name of the directory created under the platform data directory.
pub const APP_DIR_NAME: &str = "F1App";

pub const STATS_FILE: &str = "drivers_stats.json";
pub const SCHEDULE_FILE: &str = "race_schedule.json";
pub const PROCESSED_FILE: &str = "processed_races.json";
pub const DRIVER_RACES_FILE: &str = "driver_races.json";

/// Locations of every persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Uses `root` as the storage directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage directory itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `drivers_stats.json`: array of driver stats.
    #[must_use]
    pub fn stats_file(&self) -> PathBuf {
        self.root.join(STATS_FILE)
    }

    /// `race_schedule.json`: the last fetched season calendar.
    #[must_use]
    pub fn schedule_file(&self) -> PathBuf {
        self.root.join(SCHEDULE_FILE)
    }

    /// `processed_races.json`: names of races already folded into the stats.
    #[must_use]
    pub fn processed_file(&self) -> PathBuf {
        self.root.join(PROCESSED_FILE)
    }

    /// `driver_races.json`: per-driver race participation index.
    #[must_use]
    pub fn driver_races_file(&self) -> PathBuf {
        self.root.join(DRIVER_RACES_FILE)
    }

    /// Ensures the storage directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn ensure_root(&self) -> std::io::Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_live_under_root() {
        let paths = StoragePaths::new("/data/F1App");
        assert_eq!(
            paths.stats_file(),
            PathBuf::from("/data/F1App/drivers_stats.json")
        );
        assert_eq!(
            paths.processed_file(),
            PathBuf::from("/data/F1App/processed_races.json")
        );
        assert_eq!(paths.schedule_file().parent(), Some(paths.root()));
    }

    #[test]
    fn construction_does_not_create_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("F1App");
        let paths = StoragePaths::new(&root);
        assert!(!root.exists());
        paths.ensure_root().unwrap();
        assert!(root.is_dir());
    }
}
