#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived statistics types.
//!
//! [`DriverStats`] is the on-disk shape of `drivers_stats.json`: the
//! driver's roster entry plus career totals. [`DriverRaceIndex`] records
//! which races each driver took part in as of the last full run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use f1_stats_api_models::Driver;
use serde::{Deserialize, Serialize};

/// Career totals for one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStats {
    #[serde(flatten)]
    pub driver: Driver,
    /// Championship points, including fastest-lap bonus points awarded in
    /// completed seasons.
    pub total_points: f64,
    pub total_poles: u32,
    pub total_wins: u32,
    pub total_podiums: u32,
    /// Fastest laps that earned a bonus point.
    pub fastest_laps: u32,
    /// Number of distinct seasons with at least one race result.
    pub seasons_raced: u32,
}

impl DriverStats {
    /// Zeroed totals for `driver`.
    #[must_use]
    pub const fn empty(driver: Driver) -> Self {
        Self {
            driver,
            total_points: 0.0,
            total_poles: 0,
            total_wins: 0,
            total_podiums: 0,
            fastest_laps: 0,
            seasons_raced: 0,
        }
    }

    #[must_use]
    pub fn driver_id(&self) -> &str {
        &self.driver.driver_id
    }
}

/// A race a driver took part in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceIndexEntry {
    pub race_name: String,
    pub date: NaiveDate,
}

/// `driverId` → races, in career order.
pub type DriverRaceIndex = BTreeMap<String, Vec<RaceIndexEntry>>;
