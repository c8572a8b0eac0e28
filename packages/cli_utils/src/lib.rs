#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing shared by the F1 stats binaries.
//!
//! [`init_logger`] routes `log` output through a [`MultiProgress`] and
//! [`IndicatifProgress`] draws a roster run on it: one tick per driver,
//! with a line of totals printed above the bar as each driver finishes.

use std::sync::Arc;
use std::time::Duration;

use f1_stats_aggregate::RunProgress;
use f1_stats_aggregate_models::DriverStats;
use f1_stats_api::ApiError;
use f1_stats_api_models::Driver;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Draws a full run as a roster bar.
///
/// Shows a spinner with `waiting` text until a roster arrives.
pub struct IndicatifProgress {
    bar: ProgressBar,
    roster_style: ProgressStyle,
}

impl IndicatifProgress {
    #[must_use]
    pub fn roster(multi: &MultiProgress, waiting: &str) -> Arc<Self> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(120));
        Arc::new(Self::with_bar(bar, waiting))
    }

    fn with_bar(bar: ProgressBar, waiting: &str) -> Self {
        bar.set_style(
            ProgressStyle::with_template("{spinner:.red} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(waiting.to_owned());

        let roster_style = ProgressStyle::with_template(
            "{prefix:>12} {msg:<24} {bar:30.red/white} {pos:>2}/{len} drivers [{elapsed}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");

        Self { bar, roster_style }
    }

    /// Takes the bar off the screen.
    ///
    /// A bar that drew at least one roster keeps its last line; one that
    /// never got past the spinner is erased.
    pub fn close(&self) {
        if self.bar.is_finished() {
            return;
        }
        if self.bar.length().is_some() {
            self.bar.finish();
        } else {
            self.bar.finish_and_clear();
        }
    }
}

impl RunProgress for IndicatifProgress {
    fn roster_loaded(&self, season: i32, drivers: usize) {
        self.bar.reset();
        self.bar.set_style(self.roster_style.clone());
        self.bar.set_length(drivers as u64);
        self.bar.set_prefix(format!("{season} roster"));
        self.bar.set_message(String::new());
    }

    fn driver_started(&self, driver: &Driver) {
        self.bar.set_message(driver.full_name());
    }

    fn driver_done(&self, stats: &DriverStats) {
        self.bar.println(totals_line(stats));
        self.bar.inc(1);
    }

    fn run_failed(&self, driver: &Driver, error: &ApiError) {
        self.bar
            .abandon_with_message(format!("stopped at {}: {error}", driver.full_name()));
    }

    fn run_saved(&self, stats: &[DriverStats]) {
        self.bar.set_message(saved_line(stats));
    }
}

fn totals_line(stats: &DriverStats) -> String {
    format!(
        "  {:<24} {:>7} pts {:>3} wins {:>3} poles {:>2} seasons",
        stats.driver.full_name(),
        stats.total_points,
        stats.total_wins,
        stats.total_poles,
        stats.seasons_raced
    )
}

fn saved_line(stats: &[DriverStats]) -> String {
    match stats.iter().max_by(|a, b| a.total_points.total_cmp(&b.total_points)) {
        Some(leader) => format!(
            "saved {} drivers, top scorer {} ({} pts)",
            stats.len(),
            leader.driver.full_name(),
            leader.total_points
        ),
        None => "saved an empty roster".to_owned(),
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Progress bars must be added to the returned [`MultiProgress`] so log
/// lines are printed above them.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
