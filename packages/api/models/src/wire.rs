//! Raw Ergast response shapes.
//!
//! Every upstream response is wrapped in an `MRData` envelope. Numbers are
//! transported as strings, so numeric fields that drive control flow (such
//! as [`MrData::total`]) are parsed during deserialization while the rest
//! are left as strings for the readers to interpret.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::Driver;

/// Top-level response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// The `MRData` wrapper.
    #[serde(rename = "MRData")]
    pub data: MrData,
}

impl Envelope {
    /// Total number of records reported by the API for the whole query.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.data.total
    }

    /// Races contained in this page, or an empty slice if the envelope has
    /// no race table.
    #[must_use]
    pub fn races(&self) -> &[Race] {
        self.data
            .race_table
            .as_ref()
            .map_or(&[], |table| table.races.as_slice())
    }

    /// Consumes the envelope, returning its races.
    #[must_use]
    pub fn into_races(self) -> Vec<Race> {
        self.data
            .race_table
            .map(|table| table.races)
            .unwrap_or_default()
    }

    /// Consumes the envelope, returning its drivers.
    #[must_use]
    pub fn into_drivers(self) -> Vec<Driver> {
        self.data
            .driver_table
            .map(|table| table.drivers)
            .unwrap_or_default()
    }

    /// Consumes the envelope, returning its standings lists.
    #[must_use]
    pub fn into_standings_lists(self) -> Vec<StandingsList> {
        self.data
            .standings_table
            .map(|table| table.standings_lists)
            .unwrap_or_default()
    }
}

/// Contents of the `MRData` wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MrData {
    /// Total number of records matching the query (across all pages).
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub total: u64,
    /// Present on race, result and qualifying queries.
    #[serde(rename = "RaceTable", default)]
    pub race_table: Option<RaceTable>,
    /// Present on driver queries.
    #[serde(rename = "DriverTable", default)]
    pub driver_table: Option<DriverTable>,
    /// Present on standings queries.
    #[serde(rename = "StandingsTable", default)]
    pub standings_table: Option<StandingsTable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverTable {
    #[serde(rename = "Drivers", default)]
    pub drivers: Vec<Driver>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

/// A single race, optionally carrying results or qualifying rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub season: String,
    pub round: String,
    #[serde(default)]
    pub url: Option<String>,
    pub race_name: String,
    #[serde(rename = "Circuit", default)]
    pub circuit: Option<Circuit>,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(rename = "Results", default)]
    pub results: Vec<ResultEntry>,
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<QualifyingEntry>,
}

/// Circuit information attached to a race.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub circuit_id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub circuit_name: String,
    #[serde(rename = "Location", default)]
    pub location: Location,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A team as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub constructor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub nationality: String,
}

/// One row of a race classification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub position: String,
    #[serde(default)]
    pub position_text: Option<String>,
    pub points: String,
    #[serde(rename = "Driver", default)]
    pub driver: Option<Driver>,
    #[serde(rename = "Constructor", default)]
    pub constructor: Option<Constructor>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<TimeEntry>,
    #[serde(rename = "FastestLap", default)]
    pub fastest_lap: Option<FastestLapEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FastestLapEntry {
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub lap: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<TimeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeEntry {
    #[serde(default)]
    pub millis: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// One row of a qualifying classification.
#[derive(Debug, Clone, Deserialize)]
pub struct QualifyingEntry {
    pub position: String,
    #[serde(rename = "Driver", default)]
    pub driver: Option<Driver>,
    #[serde(rename = "Constructor", default)]
    pub constructor: Option<Constructor>,
}

/// Standings after a given round.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsList {
    pub season: String,
    pub round: String,
    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<DriverStandingEntry>,
    #[serde(rename = "ConstructorStandings", default)]
    pub constructor_standings: Vec<ConstructorStandingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStandingEntry {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub position_text: Option<String>,
    pub points: String,
    pub wins: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStandingEntry {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub position_text: Option<String>,
    pub points: String,
    pub wins: String,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

/// Accepts both `"24"` and `24`.
fn u64_from_str_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNumber {
        Number(u64),
        Str(String),
    }

    match StrOrNumber::deserialize(deserializer)? {
        StrOrNumber::Number(n) => Ok(n),
        StrOrNumber::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
