//! Race and qualifying results.

use std::collections::BTreeMap;

use f1_stats_api_models::wire::{Race, ResultEntry};
use f1_stats_api_models::{
    ClassifiedDriver, FastestLap, LastRaceResults, Position, QualifyingResult, RaceResult,
    RaceWinner, ResultKind,
};

use super::{SINGLE_PAGE_LIMIT, parse_number, parse_points};
use crate::paginate::{PageOptions, fetch_all_races};
use crate::{ApiError, ErgastApi};

/// Fetches every race result of a driver's career, oldest first.
///
/// # Errors
///
/// Returns [`ApiError`] if any page fails or a result cannot be parsed.
pub async fn driver_race_results(
    api: &(impl ErgastApi + ?Sized),
    driver_id: &str,
    options: PageOptions,
) -> Result<Vec<RaceResult>, ApiError> {
    let path = driver_path(driver_id, ResultKind::Results);
    let races = fetch_all_races(api, &path, options).await?;

    let mut results = Vec::with_capacity(races.len());
    for race in races {
        if let Some(result) = race_result(race)? {
            results.push(result);
        }
    }
    Ok(results)
}

/// Fetches every qualifying result of a driver's career, oldest first.
///
/// # Errors
///
/// Returns [`ApiError`] if any page fails or a result cannot be parsed.
pub async fn driver_qualifying_results(
    api: &(impl ErgastApi + ?Sized),
    driver_id: &str,
    options: PageOptions,
) -> Result<Vec<QualifyingResult>, ApiError> {
    let path = driver_path(driver_id, ResultKind::Qualifying);
    let races = fetch_all_races(api, &path, options).await?;

    let mut results = Vec::with_capacity(races.len());
    for race in races {
        let Some(entry) = race.qualifying_results.first() else {
            log::warn!("{}: no qualifying row, skipping", race.race_name);
            continue;
        };
        results.push(QualifyingResult {
            season: parse_number(&race.season, "season")?,
            round: parse_number(&race.round, "round")?,
            position: Position::parse(&entry.position),
            race_name: race.race_name,
        });
    }
    Ok(results)
}

/// Fetches the most recent race of the current season with its full
/// classification. Returns `None` before the first race of a season.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or a row cannot be parsed.
pub async fn last_race_results(
    api: &(impl ErgastApi + ?Sized),
) -> Result<Option<LastRaceResults>, ApiError> {
    let envelope = api
        .fetch_page("current/last/results", SINGLE_PAGE_LIMIT, 0)
        .await?;
    let Some(race) = envelope.into_races().into_iter().next() else {
        return Ok(None);
    };

    let results = race
        .results
        .iter()
        .map(classified_driver)
        .collect::<Result<Vec<_>, _>>()?;
    let circuit = race.circuit.as_ref();

    Ok(Some(LastRaceResults {
        circuit: circuit.map(|c| c.circuit_name.clone()),
        circuit_id: circuit.map(|c| c.circuit_id.clone()).unwrap_or_default(),
        country: circuit.and_then(|c| c.location.country.clone()),
        date: race.date,
        race_name: race.race_name,
        results,
    }))
}

/// Fetches the winner of every completed round of `season`, keyed by
/// round number.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or a round cannot be parsed.
pub async fn race_winners(
    api: &(impl ErgastApi + ?Sized),
    season: i32,
) -> Result<BTreeMap<u32, RaceWinner>, ApiError> {
    let envelope = api
        .fetch_page(&format!("{season}/results/1"), SINGLE_PAGE_LIMIT, 0)
        .await?;

    let mut winners = BTreeMap::new();
    for race in envelope.into_races() {
        let Some(result) = race.results.first() else {
            continue;
        };
        let round: u32 = parse_number(&race.round, "round")?;
        let driver = result.driver.as_ref();

        winners.insert(
            round,
            RaceWinner {
                driver_name: driver.map(|d| d.full_name()).unwrap_or_default(),
                constructor: result
                    .constructor
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                driver_nationality: driver.map(|d| d.nationality.clone()).unwrap_or_default(),
                driver_code: driver.map(|d| d.code.clone()).unwrap_or_default(),
            },
        );
    }
    Ok(winners)
}

fn driver_path(driver_id: &str, kind: ResultKind) -> String {
    format!("drivers/{driver_id}/{kind}")
}

/// Converts a per-driver race listing into that driver's result.
///
/// Returns `Ok(None)` for races that carry no result row.
fn race_result(race: Race) -> Result<Option<RaceResult>, ApiError> {
    let Some(entry) = race.results.first() else {
        log::warn!("{}: no result row, skipping", race.race_name);
        return Ok(None);
    };

    let context = format!("{} {}", race.season, race.race_name);
    let fastest_lap = match &entry.fastest_lap {
        Some(lap) => Some(FastestLap {
            rank: lap
                .rank
                .as_deref()
                .map(|rank| parse_number(rank, &context))
                .transpose()?,
        }),
        None => None,
    };

    Ok(Some(RaceResult {
        season: parse_number(&race.season, &context)?,
        round: parse_number(&race.round, &context)?,
        position: Position::parse(&entry.position),
        points: parse_points(&entry.points, &context)?,
        fastest_lap,
        date: race.date,
        race_name: race.race_name,
    }))
}

fn classified_driver(entry: &ResultEntry) -> Result<ClassifiedDriver, ApiError> {
    let driver = entry.driver.as_ref();
    Ok(ClassifiedDriver {
        position: Position::parse(&entry.position),
        driver_name: driver.map(|d| d.full_name()).unwrap_or_default(),
        driver_code: driver.map(|d| d.code.clone()).unwrap_or_default(),
        constructor: entry
            .constructor
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        points: parse_points(&entry.points, "last race")?,
        status: entry.status.clone().unwrap_or_default(),
        time: entry.time.as_ref().and_then(|t| t.time.clone()),
        fastest_lap_time: entry
            .fastest_lap
            .as_ref()
            .and_then(|lap| lap.time.as_ref())
            .and_then(|t| t.time.clone()),
    })
}
