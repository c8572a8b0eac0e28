#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Formula 1 record types.
//!
//! [`wire`] mirrors the Ergast JSON envelope verbatim. The types at the
//! crate root are the flat records the readers in `f1_stats_api` produce
//! from it: race and qualifying results, schedule entries, standings and
//! winners.

pub mod wire;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use wire::{Circuit, Constructor, Envelope, Location};

/// Start time used when the schedule does not publish one.
pub const DEFAULT_RACE_TIME: &str = "00:00:00";

/// A driver as listed on the season roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    /// Stable identifier (e.g. `"max_verstappen"`).
    pub driver_id: String,
    /// Permanent car number. Empty for drivers who predate permanent numbers.
    #[serde(default)]
    pub permanent_number: String,
    /// Three-letter code. Empty for drivers who predate codes.
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub nationality: String,
}

impl Driver {
    /// Returns `"{given} {family}"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Which per-driver result listing to page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResultKind {
    /// `drivers/{id}/results`
    Results,
    /// `drivers/{id}/qualifying`
    Qualifying,
}

/// A finishing or qualifying position.
///
/// Classified positions are 1-based ranks. Anything the API reports that
/// is not a plain integer is kept verbatim as a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Classified(u32),
    Status(String),
}

impl Position {
    /// Parses an API position string.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        value
            .trim()
            .parse::<u32>()
            .map_or_else(|_| Self::Status(value.to_owned()), Self::Classified)
    }

    /// The numeric rank, if classified.
    #[must_use]
    pub const fn rank(&self) -> Option<u32> {
        match self {
            Self::Classified(rank) => Some(*rank),
            Self::Status(_) => None,
        }
    }

    #[must_use]
    pub const fn is_win(&self) -> bool {
        matches!(self, Self::Classified(1))
    }

    #[must_use]
    pub const fn is_podium(&self) -> bool {
        matches!(self, Self::Classified(1..=3))
    }

    /// Whether this is a classified position no worse than `rank`.
    #[must_use]
    pub const fn within(&self, rank: u32) -> bool {
        match self {
            Self::Classified(pos) => *pos <= rank,
            Self::Status(_) => false,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classified(rank) => write!(f, "{rank}"),
            Self::Status(status) => f.write_str(status),
        }
    }
}

/// The `FastestLap` block of a race result.
///
/// Present whenever upstream flags a fastest lap for the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastestLap {
    /// Rank of this driver's fastest lap within the race, if published.
    pub rank: Option<u32>,
}

/// One driver's classification in one race.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceResult {
    pub season: i32,
    pub round: u32,
    pub race_name: String,
    pub date: NaiveDate,
    pub position: Position,
    pub points: f64,
    pub fastest_lap: Option<FastestLap>,
}

/// One driver's qualifying classification in one race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingResult {
    pub season: i32,
    pub round: u32,
    pub race_name: String,
    pub position: Position,
}

/// A race on the season calendar.
///
/// This is also the on-disk shape of `race_schedule.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceScheduleEntry {
    pub round: String,
    pub race_name: String,
    #[serde(default)]
    pub race_url: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub circuit_name: Option<String>,
    #[serde(default = "default_race_time")]
    pub time: String,
    #[serde(default)]
    pub circuit_id: Option<String>,
    #[serde(default)]
    pub circuit_url: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

fn default_race_time() -> String {
    DEFAULT_RACE_TIME.to_owned()
}

impl RaceScheduleEntry {
    /// Race start as a naive UTC date-time. An unparseable time falls back
    /// to midnight.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        let time = NaiveTime::parse_from_str(self.time.trim_end_matches('Z'), "%H:%M:%S")
            .unwrap_or(NaiveTime::MIN);
        self.date.and_time(time)
    }
}

/// A driver's position in the championship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    /// `None` for drivers who are listed but unclassified.
    pub position: Option<u32>,
    pub position_text: String,
    pub points: f64,
    pub wins: u32,
    pub driver: Driver,
    /// First constructor the driver raced for this season.
    pub constructor: Option<Constructor>,
}

/// A constructor's position in the championship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStanding {
    pub position: Option<u32>,
    pub position_text: String,
    pub points: f64,
    pub wins: u32,
    pub constructor: Constructor,
}

/// Winner of a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceWinner {
    pub driver_name: String,
    pub constructor: String,
    pub driver_nationality: String,
    pub driver_code: String,
}

/// One row of the most recent race's classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDriver {
    pub position: Position,
    pub driver_name: String,
    pub driver_code: String,
    pub constructor: String,
    pub points: f64,
    pub status: String,
    /// Race time or gap, when the driver finished on the lead lap.
    pub time: Option<String>,
    pub fastest_lap_time: Option<String>,
}

/// The most recent race and its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastRaceResults {
    pub race_name: String,
    pub circuit: Option<String>,
    pub circuit_id: String,
    pub country: Option<String>,
    pub date: NaiveDate,
    pub results: Vec<ClassifiedDriver>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_parsing() {
        assert_eq!(Position::parse("1"), Position::Classified(1));
        assert_eq!(Position::parse("R"), Position::Status("R".to_owned()));
        assert!(Position::parse("1").is_win());
        assert!(Position::parse("3").is_podium());
        assert!(!Position::parse("4").is_podium());
        assert!(!Position::parse("W").is_podium());
        assert!(Position::parse("10").within(10));
        assert!(!Position::parse("11").within(10));
        assert!(!Position::parse("D").within(10));
    }

    #[test]
    fn schedule_entry_defaults_to_midnight() {
        let entry: RaceScheduleEntry = serde_json::from_value(serde_json::json!({
            "round": "1",
            "raceName": "Bahrain Grand Prix",
            "date": "2025-03-02"
        }))
        .unwrap();
        assert_eq!(entry.time, DEFAULT_RACE_TIME);
        assert_eq!(
            entry.starts_at(),
            NaiveDate::from_ymd_opt(2025, 3, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn schedule_entry_parses_utc_time() {
        let entry: RaceScheduleEntry = serde_json::from_value(serde_json::json!({
            "round": "1",
            "raceName": "Bahrain Grand Prix",
            "date": "2025-03-02",
            "time": "15:00:00Z"
        }))
        .unwrap();
        assert_eq!(
            entry.starts_at().time(),
            NaiveTime::from_hms_opt(15, 0, 0).unwrap()
        );
    }

    #[test]
    fn driver_defaults_missing_number_and_code() {
        let driver: Driver = serde_json::from_value(serde_json::json!({
            "driverId": "hulkenberg",
            "givenName": "Nico",
            "familyName": "Hülkenberg",
            "nationality": "German"
        }))
        .unwrap();
        assert_eq!(driver.permanent_number, "");
        assert_eq!(driver.code, "");
        assert_eq!(driver.full_name(), "Nico Hülkenberg");
    }

    #[test]
    fn result_kind_paths() {
        assert_eq!(ResultKind::Results.as_ref(), "results");
        assert_eq!(ResultKind::Qualifying.to_string(), "qualifying");
    }
}
