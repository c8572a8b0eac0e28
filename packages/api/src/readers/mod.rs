//! Readers that map API envelopes into flat records.
//!
//! Each reader issues the request(s) for one view of the data (schedule,
//! standings, results, roster) and converts the wire types into the
//! records defined in `f1_stats_api_models`.

pub mod drivers;
pub mod results;
pub mod schedule;
pub mod standings;

pub use drivers::current_drivers;
pub use results::{
    driver_qualifying_results, driver_race_results, last_race_results, race_winners,
};
pub use schedule::race_schedule;
pub use standings::{constructor_standings, driver_standings};

use crate::ApiError;

/// Page size for single-shot listings that comfortably fit one page.
pub(crate) const SINGLE_PAGE_LIMIT: u32 = 1000;

pub(crate) fn parse_points(value: &str, context: &str) -> Result<f64, ApiError> {
    value.trim().parse().map_err(|_| ApiError::Malformed {
        message: format!("{context}: invalid points value '{value}'"),
    })
}

pub(crate) fn parse_number<T: std::str::FromStr>(value: &str, context: &str) -> Result<T, ApiError> {
    value.trim().parse().map_err(|_| ApiError::Malformed {
        message: format!("{context}: invalid number '{value}'"),
    })
}
