#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Post-race update check.
//!
//! The persisted race schedule says when each race happens; the processed
//! set says which races are already folded into `drivers_stats.json`. A
//! race becomes due one day after its date. Every due race that is not yet
//! processed triggers a full aggregation run and is then marked processed.
//! A race is never un-marked, and a failed run leaves it due for the next
//! check.
//!
//! [`Updater::spawn`] runs one check on a background task and returns an
//! [`UpdateHandle`].

mod handle;

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use f1_stats_aggregate::{AggregateError, RunOptions, RunProgress, Silent, run_full_update};
use f1_stats_api::readers::race_schedule;
use f1_stats_api::{ApiError, ErgastApi};
use f1_stats_api_models::RaceScheduleEntry;
use f1_stats_storage::{Storage, StorageError};

pub use handle::UpdateHandle;

/// Days between a race and the moment it becomes due.
pub const UPDATE_DELAY_DAYS: u64 = 1;

/// Errors that can occur during an update check.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No schedule has been persisted yet.
    ScheduleMissing,
    /// Every due race was already processed.
    NothingDue,
    /// These races triggered a run and are now processed, in schedule
    /// order.
    Updated(Vec<String>),
}

/// Runs update checks against one storage directory.
pub struct Updater {
    api: Arc<dyn ErgastApi>,
    storage: Storage,
    options: RunOptions,
    progress: Arc<dyn RunProgress>,
}

impl Updater {
    #[must_use]
    pub fn new(api: Arc<dyn ErgastApi>, storage: Storage, options: RunOptions) -> Self {
        Self {
            api,
            storage,
            options,
            progress: Arc::new(Silent),
        }
    }

    /// Sends the hooks of every full run this updater triggers to
    /// `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn RunProgress>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Whether `race` is due on `today`.
    #[must_use]
    pub fn is_due(race: &RaceScheduleEntry, today: NaiveDate) -> bool {
        race.date
            .checked_add_days(Days::new(UPDATE_DELAY_DAYS))
            .is_some_and(|due| due <= today)
    }

    /// Fetches the season schedule and persists it. Also creates an empty
    /// processed-race file if there is none yet.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] if the schedule cannot be fetched or written.
    pub async fn refresh_schedule(&self) -> Result<Vec<RaceScheduleEntry>, UpdateError> {
        let schedule = race_schedule(&*self.api, self.options.season).await?;
        self.storage.save_schedule(&schedule)?;
        if self.storage.ensure_processed_file()? {
            log::debug!(
                "Created {}",
                self.storage.paths().processed_file().display()
            );
        }
        log::info!(
            "Saved {} races of the {} schedule",
            schedule.len(),
            self.options.season
        );
        Ok(schedule)
    }

    /// Runs one check as of `today`.
    ///
    /// The processed set is written only if at least one race completed.
    /// If a run fails, races that completed earlier in the same check are
    /// still persisted before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] if a document cannot be read or written, or
    /// a full run fails.
    pub async fn check_on(&self, today: NaiveDate) -> Result<CheckOutcome, UpdateError> {
        let Some(schedule) = self.storage.load_schedule()? else {
            log::warn!(
                "Race schedule for {} not found: {}",
                self.options.season,
                self.storage.paths().schedule_file().display()
            );
            return Ok(CheckOutcome::ScheduleMissing);
        };

        let mut processed = self.storage.load_processed()?;
        let mut updated = Vec::new();

        for race in &schedule {
            if !Self::is_due(race, today) || processed.contains(&race.race_name) {
                continue;
            }

            log::info!("Updating stats after {}...", race.race_name);
            if let Err(e) =
                run_full_update(&*self.api, &self.storage, &self.options, &*self.progress).await
            {
                if !updated.is_empty()
                    && let Err(save_err) = self.storage.save_processed(&processed)
                {
                    log::error!(
                        "Failed to record {} before aborting: {save_err}",
                        updated.join(", ")
                    );
                }
                return Err(e.into());
            }

            processed.insert(race.race_name.clone());
            updated.push(race.race_name.clone());
        }

        if updated.is_empty() {
            log::info!("No new races to process");
            return Ok(CheckOutcome::NothingDue);
        }

        self.storage.save_processed(&processed)?;
        log::info!(
            "Processed file updated: {}",
            self.storage.paths().processed_file().display()
        );
        Ok(CheckOutcome::Updated(updated))
    }

    /// Runs one check as of the local date. Errors are logged and
    /// swallowed.
    pub async fn check_and_maybe_update(&self) -> Option<CheckOutcome> {
        match self.check_on(Local::now().date_naive()).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::error!("Update check failed: {e}");
                None
            }
        }
    }

    /// Runs [`Updater::check_and_maybe_update`] on a background task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(self) -> UpdateHandle {
        UpdateHandle::new(tokio::spawn(
            async move { self.check_and_maybe_update().await },
        ))
    }
}
