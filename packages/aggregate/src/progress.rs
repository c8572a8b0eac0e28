//! Hooks fired while a full run walks the roster.
//!
//! A run reports `roster_loaded` once, then `driver_started` and
//! `driver_done` per driver, and ends with either `run_saved` or
//! `run_failed`. Every hook has an empty default body.

use f1_stats_aggregate_models::DriverStats;
use f1_stats_api::ApiError;
use f1_stats_api_models::Driver;

/// Observer of a [`crate::run_full_update`] call.
///
/// Shared with the spawned update task, hence `Send + Sync`.
pub trait RunProgress: Send + Sync {
    /// The `season` roster was fetched and has `drivers` entries.
    fn roster_loaded(&self, _season: i32, _drivers: usize) {}

    /// Fetching history for `driver` is about to start.
    fn driver_started(&self, _driver: &Driver) {}

    /// Career totals for one driver are ready.
    fn driver_done(&self, _stats: &DriverStats) {}

    /// The run stopped at `driver`. Nothing was written.
    fn run_failed(&self, _driver: &Driver, _error: &ApiError) {}

    /// Stats and race index were written for every driver in `stats`.
    fn run_saved(&self, _stats: &[DriverStats]) {}
}

/// Reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl RunProgress for Silent {}
