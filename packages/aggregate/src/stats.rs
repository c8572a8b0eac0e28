//! Career statistics for a single driver.

use std::collections::BTreeSet;

use f1_stats_aggregate_models::{DriverStats, RaceIndexEntry};
use f1_stats_api::readers::{driver_qualifying_results, driver_race_results};
use f1_stats_api::{ApiError, ErgastApi, PageOptions};
use f1_stats_api_models::{Driver, QualifyingResult, RaceResult};

/// First season in which a fastest lap earned a championship point.
pub const FASTEST_LAP_BONUS_FROM: i32 = 2019;

/// Only finishers at or above this position get the fastest-lap point.
pub const FASTEST_LAP_BONUS_MAX_POSITION: u32 = 10;

/// Computes `driver`'s career totals from their full race and qualifying
/// history.
///
/// # Errors
///
/// Returns [`ApiError`] if any page cannot be fetched. No partial stats are
/// produced.
pub async fn compute_driver_stats(
    api: &(impl ErgastApi + ?Sized),
    driver: &Driver,
    current_season: i32,
    options: PageOptions,
) -> Result<DriverStats, ApiError> {
    let (stats, _) = driver_career(api, driver, current_season, options).await?;
    Ok(stats)
}

/// Like [`compute_driver_stats`] but also returns the races the driver
/// took part in, in career order.
pub(crate) async fn driver_career(
    api: &(impl ErgastApi + ?Sized),
    driver: &Driver,
    current_season: i32,
    options: PageOptions,
) -> Result<(DriverStats, Vec<RaceIndexEntry>), ApiError> {
    log::info!("Processing {}...", driver.full_name());

    let results = driver_race_results(api, &driver.driver_id, options).await?;
    let qualifying = driver_qualifying_results(api, &driver.driver_id, options).await?;

    let stats = tally(driver.clone(), &results, &qualifying, current_season);
    let races = results
        .into_iter()
        .map(|result| RaceIndexEntry {
            race_name: result.race_name,
            date: result.date,
        })
        .collect();

    log::debug!(
        "{}: {} points, {} wins, {} poles over {} seasons",
        stats.driver_id(),
        stats.total_points,
        stats.total_wins,
        stats.total_poles,
        stats.seasons_raced
    );

    Ok((stats, races))
}

/// Folds race and qualifying results into career totals.
#[must_use]
pub fn tally(
    driver: Driver,
    results: &[RaceResult],
    qualifying: &[QualifyingResult],
    current_season: i32,
) -> DriverStats {
    let mut stats = DriverStats::empty(driver);
    let mut seasons = BTreeSet::new();

    for result in results {
        stats.total_points += result.points;
        if earns_fastest_lap_bonus(result, current_season) {
            stats.total_points += 1.0;
            stats.fastest_laps += 1;
        }
        if result.position.is_win() {
            stats.total_wins += 1;
        }
        if result.position.is_podium() {
            stats.total_podiums += 1;
        }
        seasons.insert(result.season);
    }

    stats.total_poles = count(qualifying.iter().filter(|q| q.position.is_win()));
    stats.seasons_raced = count(seasons.iter());
    stats
}

/// Whether `result` earns the extra point for the fastest lap.
///
/// Only completed seasons from 2019 on are credited; the current season's
/// points as published upstream are taken as they are. Any flagged fastest
/// lap qualifies, whatever its rank.
#[must_use]
pub const fn earns_fastest_lap_bonus(result: &RaceResult, current_season: i32) -> bool {
    result.season >= FASTEST_LAP_BONUS_FROM
        && result.season < current_season
        && result.position.within(FASTEST_LAP_BONUS_MAX_POSITION)
        && result.fastest_lap.is_some()
}

fn count<I: Iterator>(iter: I) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use f1_stats_api_models::{Envelope, FastestLap, Position};

    use super::*;

    fn driver() -> Driver {
        serde_json::from_value(serde_json::json!({
            "driverId": "hamilton",
            "permanentNumber": "44",
            "code": "HAM",
            "givenName": "Lewis",
            "familyName": "Hamilton",
            "dateOfBirth": "1985-01-07",
            "nationality": "British"
        }))
        .unwrap()
    }

    fn result(season: i32, position: &str, points: f64, fastest: Option<u32>) -> RaceResult {
        RaceResult {
            season,
            round: 1,
            race_name: format!("Race {season}"),
            date: NaiveDate::from_ymd_opt(season, 6, 1).unwrap(),
            position: Position::parse(position),
            points,
            fastest_lap: fastest.map(|rank| FastestLap { rank: Some(rank) }),
        }
    }

    fn pole(season: i32, position: &str) -> QualifyingResult {
        QualifyingResult {
            season,
            round: 1,
            race_name: format!("Race {season}"),
            position: Position::parse(position),
        }
    }

    #[test]
    fn counts_distinct_seasons() {
        let results = [
            result(2023, "4", 12.0, None),
            result(2024, "5", 10.0, None),
            result(2024, "6", 8.0, None),
        ];
        let stats = tally(driver(), &results, &[], 2025);
        assert_eq!(stats.seasons_raced, 2);
    }

    #[test]
    fn no_bonus_in_current_season() {
        let results = [result(2025, "1", 25.0, Some(1))];
        let stats = tally(driver(), &results, &[], 2025);
        assert!((stats.total_points - 25.0).abs() < f64::EPSILON);
        assert_eq!(stats.fastest_laps, 0);
    }

    #[test]
    fn bonus_for_completed_seasons_from_2019() {
        let results = [
            result(2018, "1", 25.0, Some(1)),
            result(2019, "1", 25.0, Some(1)),
            result(2024, "10", 1.0, Some(1)),
            result(2024, "11", 0.0, Some(1)),
            result(2024, "3", 15.0, Some(4)),
        ];
        let stats = tally(driver(), &results, &[], 2025);
        assert_eq!(stats.fastest_laps, 3);
        assert!((stats.total_points - (25.0 + 26.0 + 2.0 + 0.0 + 16.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn ranked_fastest_lap_flag_earns_bonus() {
        let stats = tally(driver(), &[result(2020, "3", 15.0, Some(2))], &[], 2025);
        assert!((stats.total_points - 16.0).abs() < f64::EPSILON);
        assert_eq!(stats.fastest_laps, 1);
    }

    #[test]
    fn unranked_fastest_lap_counts() {
        let mut unranked = result(2020, "2", 18.0, None);
        unranked.fastest_lap = Some(FastestLap { rank: None });
        let stats = tally(driver(), &[unranked], &[], 2025);
        assert_eq!(stats.fastest_laps, 1);
    }

    #[test]
    fn wins_podiums_and_poles() {
        let results = [
            result(2021, "1", 25.0, None),
            result(2021, "3", 15.0, None),
            result(2021, "4", 12.0, None),
            result(2021, "R", 0.0, Some(1)),
        ];
        let qualifying = [pole(2021, "1"), pole(2021, "2"), pole(2021, "1")];
        let stats = tally(driver(), &results, &qualifying, 2025);
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.total_podiums, 2);
        assert_eq!(stats.total_poles, 2);
        assert_eq!(stats.fastest_laps, 0);
    }

    /// Serves `drivers/hamilton/{results,qualifying}` from fixed lists.
    struct CareerApi {
        pages: BTreeMap<String, Vec<serde_json::Value>>,
        requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ErgastApi for CareerApi {
        async fn fetch_page(
            &self,
            resource_path: &str,
            limit: u32,
            offset: u64,
        ) -> Result<Envelope, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push(format!("{resource_path}@{offset}"));
            let all = self.pages.get(resource_path).cloned().unwrap_or_default();
            let page: Vec<_> = all
                .iter()
                .skip(usize::try_from(offset).unwrap())
                .take(limit as usize)
                .cloned()
                .collect();
            Ok(serde_json::from_value(serde_json::json!({
                "MRData": {"total": all.len().to_string(), "RaceTable": {"Races": page}}
            }))
            .unwrap())
        }
    }

    #[tokio::test]
    async fn computes_stats_across_pages() {
        let results: Vec<_> = (0..150)
            .map(|i| {
                let season = 2007 + i / 10;
                let position = if i % 3 == 0 { "1" } else { "5" };
                serde_json::json!({
                    "season": season.to_string(), "round": (i % 10 + 1).to_string(),
                    "raceName": format!("Race {i}"), "date": format!("{season}-05-01"),
                    "Results": [{"position": position, "points": "10"}]
                })
            })
            .collect();
        let qualifying = vec![serde_json::json!({
            "season": "2007", "round": "1", "raceName": "Race 0", "date": "2007-05-01",
            "QualifyingResults": [{"position": "1"}]
        })];

        let mut pages = BTreeMap::new();
        pages.insert("drivers/hamilton/results".to_owned(), results);
        pages.insert("drivers/hamilton/qualifying".to_owned(), qualifying);
        let api = CareerApi {
            pages,
            requests: Mutex::new(Vec::new()),
        };

        let options = PageOptions {
            page_size: 100,
            delay: Duration::ZERO,
        };
        let (stats, races) = driver_career(&api, &driver(), 2025, options)
            .await
            .unwrap();

        assert_eq!(races.len(), 150);
        assert_eq!(races[0].race_name, "Race 0");
        assert_eq!(stats.seasons_raced, 15);
        assert_eq!(stats.total_wins, 50);
        assert_eq!(stats.total_podiums, 50);
        assert_eq!(stats.total_poles, 1);
        assert!((stats.total_points - 1500.0).abs() < f64::EPSILON);
        assert_eq!(
            *api.requests.lock().unwrap(),
            [
                "drivers/hamilton/results@0",
                "drivers/hamilton/results@100",
                "drivers/hamilton/qualifying@0",
            ]
        );
    }
}
