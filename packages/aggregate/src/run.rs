//! Full roster aggregation run.

use f1_stats_aggregate_models::{DriverRaceIndex, DriverStats};
use f1_stats_api::ErgastApi;
use f1_stats_api::readers::current_drivers;
use f1_stats_storage::Storage;

use crate::progress::RunProgress;
use crate::stats::driver_career;
use crate::{AggregateError, RunOptions};

/// Recomputes stats for every driver on the `options.season` roster and
/// overwrites `drivers_stats.json` and `driver_races.json`.
///
/// Drivers are processed one at a time with `options.driver_delay` between
/// them. If any driver fails the run is aborted and nothing is written.
///
/// # Errors
///
/// Returns [`AggregateError::Api`] if the roster or any driver's history
/// cannot be fetched, or [`AggregateError::Storage`] if the results cannot
/// be persisted.
pub async fn run_full_update(
    api: &(impl ErgastApi + ?Sized),
    storage: &Storage,
    options: &RunOptions,
    progress: &dyn RunProgress,
) -> Result<(Vec<DriverStats>, DriverRaceIndex), AggregateError> {
    let drivers = current_drivers(api, options.season).await?;
    log::info!(
        "Aggregating career stats for {} drivers of the {} roster",
        drivers.len(),
        options.season
    );

    progress.roster_loaded(options.season, drivers.len());

    let mut all_stats = Vec::with_capacity(drivers.len());
    let mut index = DriverRaceIndex::new();

    for (i, driver) in drivers.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(options.driver_delay).await;
        }
        progress.driver_started(driver);

        let (stats, races) = driver_career(api, driver, options.season, options.pages)
            .await
            .inspect_err(|e| {
                log::error!("Aborting run at {}: {e}", driver.driver_id);
                progress.run_failed(driver, e);
            })?;

        progress.driver_done(&stats);
        index.insert(driver.driver_id.clone(), races);
        all_stats.push(stats);
    }

    storage.save_stats(&all_stats)?;
    storage.save_race_index(&index)?;

    progress.run_saved(&all_stats);
    log::info!(
        "Saved stats for {} drivers to {}",
        all_stats.len(),
        storage.paths().stats_file().display()
    );

    Ok((all_stats, index))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use f1_stats_api::{ApiError, FetchFailure, PageOptions};
    use f1_stats_api_models::{Driver, Envelope};
    use f1_stats_storage::StoragePaths;

    use super::*;
    use crate::progress::Silent;

    /// Serves a two-driver roster and their histories. Requests for
    /// `failing` exhaust their retries.
    struct SeasonApi {
        failing: Option<&'static str>,
        requests: Mutex<Vec<String>>,
    }

    impl SeasonApi {
        fn new(failing: Option<&'static str>) -> Self {
            Self {
                failing,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn roster() -> serde_json::Value {
            serde_json::json!({"MRData": {"total": "2", "DriverTable": {"Drivers": [
                {"driverId": "norris", "permanentNumber": "4", "code": "NOR",
                 "givenName": "Lando", "familyName": "Norris",
                 "dateOfBirth": "1999-11-13", "nationality": "British"},
                {"driverId": "bearman", "givenName": "Oliver", "familyName": "Bearman",
                 "dateOfBirth": "2005-05-08", "nationality": "British"}
            ]}}})
        }

        fn history(driver_id: &str, kind: &str) -> serde_json::Value {
            let rows = if kind == "results" {
                serde_json::json!({"Results": [{"position": "1", "points": "25",
                                                "FastestLap": {"rank": "1"}}]})
            } else {
                serde_json::json!({"QualifyingResults": [{"position": "1"}]})
            };
            let mut race = serde_json::json!({
                "season": "2024", "round": "1", "raceName": format!("{driver_id} GP"),
                "date": "2024-03-02"
            });
            race.as_object_mut()
                .unwrap()
                .extend(rows.as_object().unwrap().clone());
            serde_json::json!({"MRData": {"total": "1", "RaceTable": {"Races": [race]}}})
        }
    }

    #[async_trait]
    impl ErgastApi for SeasonApi {
        async fn fetch_page(
            &self,
            resource_path: &str,
            _limit: u32,
            _offset: u64,
        ) -> Result<Envelope, ApiError> {
            self.requests.lock().unwrap().push(resource_path.to_owned());

            let body = match resource_path.split('/').collect::<Vec<_>>().as_slice() {
                ["2025", "drivers"] => Self::roster(),
                ["drivers", id, _] if Some(*id) == self.failing => {
                    return Err(ApiError::FetchExhausted {
                        url: resource_path.to_owned(),
                        attempts: 3,
                        source: FetchFailure::Status {
                            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                        },
                    });
                }
                ["drivers", id, kind] => Self::history(id, kind),
                _ => panic!("unexpected request {resource_path}"),
            };
            Ok(serde_json::from_value(body).unwrap())
        }
    }

    fn options() -> RunOptions {
        RunOptions {
            season: 2025,
            pages: PageOptions {
                page_size: 100,
                delay: Duration::ZERO,
            },
            driver_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn persists_stats_and_race_index() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(StoragePaths::new(dir.path()));
        let api = SeasonApi::new(None);

        let (stats, index) = run_full_update(&api, &storage, &options(), &Silent)
            .await
            .unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].driver_id(), "norris");
        assert_eq!(stats[1].driver.permanent_number, "");
        assert!((stats[0].total_points - 26.0).abs() < f64::EPSILON);
        assert_eq!(stats[0].total_poles, 1);

        assert_eq!(storage.load_stats().unwrap(), stats);
        let persisted: BTreeMap<_, _> = storage.load_race_index().unwrap();
        assert_eq!(persisted, index);
        assert_eq!(persisted["bearman"][0].race_name, "bearman GP");

        // Nothing leaks into the processed-race set.
        assert!(!storage.paths().processed_file().exists());

        assert_eq!(
            *api.requests.lock().unwrap(),
            [
                "2025/drivers",
                "drivers/norris/results",
                "drivers/norris/qualifying",
                "drivers/bearman/results",
                "drivers/bearman/qualifying",
            ]
        );
    }

    #[tokio::test]
    async fn failure_aborts_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(StoragePaths::new(dir.path()));
        let api = SeasonApi::new(Some("bearman"));

        let err = run_full_update(&api, &storage, &options(), &Silent)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AggregateError::Api(ApiError::FetchExhausted { attempts: 3, .. })
        ));
        assert!(!storage.paths().stats_file().exists());
        assert!(!storage.paths().driver_races_file().exists());
    }

    /// Records hook calls as short strings.
    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl RunProgress for Recorder {
        fn roster_loaded(&self, season: i32, drivers: usize) {
            self.0.lock().unwrap().push(format!("roster {season} {drivers}"));
        }

        fn driver_started(&self, driver: &Driver) {
            self.0.lock().unwrap().push(format!("start {}", driver.full_name()));
        }

        fn driver_done(&self, stats: &DriverStats) {
            self.0
                .lock()
                .unwrap()
                .push(format!("done {} {}", stats.driver_id(), stats.total_points));
        }

        fn run_failed(&self, driver: &Driver, error: &ApiError) {
            let attempts = match error {
                ApiError::FetchExhausted { attempts, .. } => *attempts,
                _ => 0,
            };
            self.0
                .lock()
                .unwrap()
                .push(format!("failed {} after {attempts}", driver.driver_id));
        }

        fn run_saved(&self, stats: &[DriverStats]) {
            self.0.lock().unwrap().push(format!("saved {}", stats.len()));
        }
    }

    #[tokio::test]
    async fn reports_each_driver_then_the_save() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(StoragePaths::new(dir.path()));
        let recorder = Recorder::default();

        run_full_update(&SeasonApi::new(None), &storage, &options(), &recorder)
            .await
            .unwrap();

        assert_eq!(
            *recorder.0.lock().unwrap(),
            [
                "roster 2025 2",
                "start Lando Norris",
                "done norris 26",
                "start Oliver Bearman",
                "done bearman 26",
                "saved 2",
            ]
        );
    }

    #[tokio::test]
    async fn reports_the_driver_that_stopped_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(StoragePaths::new(dir.path()));
        let recorder = Recorder::default();

        run_full_update(&SeasonApi::new(Some("bearman")), &storage, &options(), &recorder)
            .await
            .unwrap_err();

        assert_eq!(
            *recorder.0.lock().unwrap(),
            [
                "roster 2025 2",
                "start Lando Norris",
                "done norris 26",
                "start Oliver Bearman",
                "failed bearman after 3",
            ]
        );
    }
}
