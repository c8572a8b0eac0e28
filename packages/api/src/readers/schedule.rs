//! Season calendar.

use f1_stats_api_models::wire::Race;
use f1_stats_api_models::{DEFAULT_RACE_TIME, RaceScheduleEntry};

use super::SINGLE_PAGE_LIMIT;
use crate::{ApiError, ErgastApi};

/// Fetches the race calendar of `season`, in round order.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn race_schedule(
    api: &(impl ErgastApi + ?Sized),
    season: i32,
) -> Result<Vec<RaceScheduleEntry>, ApiError> {
    let envelope = api
        .fetch_page(&format!("{season}/races"), SINGLE_PAGE_LIMIT, 0)
        .await?;
    Ok(envelope.into_races().into_iter().map(schedule_entry).collect())
}

fn schedule_entry(race: Race) -> RaceScheduleEntry {
    let circuit = race.circuit.unwrap_or_default();
    let location = circuit.location;

    RaceScheduleEntry {
        round: race.round,
        race_name: race.race_name,
        race_url: race.url,
        date: race.date,
        circuit_name: Some(circuit.circuit_name).filter(|name| !name.is_empty()),
        time: race.time.unwrap_or_else(|| DEFAULT_RACE_TIME.to_owned()),
        circuit_id: Some(circuit.circuit_id).filter(|id| !id.is_empty()),
        circuit_url: circuit.url,
        lat: location.lat,
        long: location.long,
        locality: location.locality,
        country: location.country,
    }
}
