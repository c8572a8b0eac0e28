#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Career statistics aggregation.
//!
//! [`compute_driver_stats`] derives one driver's [`DriverStats`] from their
//! complete race and qualifying history. [`run_full_update`] does this for
//! every driver on a season roster and persists the results.
//!
//! [`DriverStats`]: f1_stats_aggregate_models::DriverStats

pub mod progress;
pub mod run;
pub mod stats;

use std::time::Duration;

use f1_stats_api::{ApiError, PageOptions};
use f1_stats_storage::StorageError;

pub use progress::{RunProgress, Silent};
pub use run::run_full_update;
pub use stats::{compute_driver_stats, earns_fastest_lap_bonus, tally};

/// Pause between two drivers of a full run.
pub const DEFAULT_DRIVER_DELAY: Duration = Duration::from_millis(500);

/// Season whose roster is aggregated when none is configured.
pub const DEFAULT_SEASON: i32 = 2025;

/// Errors that can occur during a full run.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// Fetching the roster or a driver's history failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The results could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Parameters of a full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Roster season. Also the season excluded from the fastest-lap bonus.
    pub season: i32,
    /// Paging of each driver's history.
    pub pages: PageOptions,
    /// Pause between drivers.
    pub driver_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON,
            pages: PageOptions::default(),
            driver_delay: DEFAULT_DRIVER_DELAY,
        }
    }
}
