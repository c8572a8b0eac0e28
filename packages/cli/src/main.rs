#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the F1 stats pipeline.
//!
//! Uses `indicatif-log-bridge` (via [`f1_stats_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the full-run progress bar never fight for the terminal.

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use f1_stats_aggregate::{RunProgress, run_full_update};
use f1_stats_api::{ErgastApi, ErgastClient, readers};
use f1_stats_cli_utils::IndicatifProgress;
use f1_stats_config::Settings;
use f1_stats_storage::Storage;
use f1_stats_updater::{CheckOutcome, Updater};

#[derive(Parser)]
#[command(name = "f1_stats", about = "Formula 1 statistics fetcher and cache")]
struct Cli {
    /// Path to a TOML config file (overrides `F1_STATS_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Season to query (overrides the configured season)
    #[arg(long, global = true)]
    season: Option<i32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the race calendar and save it as the update schedule
    Schedule,
    /// Show the drivers' championship standings
    DriverStandings,
    /// Show the constructors' championship standings
    ConstructorStandings,
    /// Show the classification of the most recent race
    LastResults,
    /// Show the winner of every completed round
    Winners,
    /// List the drivers on the season roster
    Drivers,
    /// Recompute career stats for the whole roster and save them
    Stats,
    /// Run the post-race update check and wait for it to finish
    Check,
    /// Show saved career stats for one driver
    Show {
        /// Driver identifier (e.g., "`max_verstappen`")
        driver_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = f1_stats_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(season) = cli.season {
        settings.season = season;
    }
    let storage = Storage::new(settings.storage_paths()?);
    let api: Arc<dyn ErgastApi> = Arc::new(ErgastClient::new(settings.client_options())?);
    let season = settings.season;

    log::debug!(
        "Using {} (season {season}), storage at {}",
        settings.base_url,
        storage.paths().root().display()
    );

    match cli.command {
        Commands::Schedule => {
            let updater = Updater::new(api, storage, settings.run_options());
            let schedule = updater.refresh_schedule().await?;
            render::schedule(&schedule);
        }
        Commands::DriverStandings => {
            render::driver_standings(&readers::driver_standings(&*api, season).await?);
        }
        Commands::ConstructorStandings => {
            render::constructor_standings(&readers::constructor_standings(&*api, season).await?);
        }
        Commands::LastResults => match readers::last_race_results(&*api).await? {
            Some(last) => render::last_results(&last),
            None => println!("No race has been run yet this season."),
        },
        Commands::Winners => {
            render::winners(&readers::race_winners(&*api, season).await?);
        }
        Commands::Drivers => {
            render::drivers(&readers::current_drivers(&*api, season).await?);
        }
        Commands::Stats => {
            let progress = IndicatifProgress::roster(&multi, "Fetching roster...");
            let run = run_full_update(&*api, &storage, &settings.run_options(), &*progress).await;
            progress.close();
            let (stats, _) = run?;
            render::stats_table(&stats);
        }
        Commands::Check => {
            let progress = IndicatifProgress::roster(&multi, "Checking for new races...");
            let handle = Updater::new(api, storage, settings.run_options())
                .with_progress(Arc::clone(&progress) as Arc<dyn RunProgress>)
                .spawn();
            let outcome = handle.join().await;
            progress.close();
            match outcome {
                Some(CheckOutcome::ScheduleMissing) => {
                    println!("No saved schedule. Run `f1_stats schedule` first.");
                }
                Some(CheckOutcome::NothingDue) => println!("No new races to process."),
                Some(CheckOutcome::Updated(races)) => {
                    println!("Stats updated after: {}", races.join(", "));
                }
                None => return Err("update check failed; see log for details".into()),
            }
        }
        Commands::Show { driver_id } => {
            let Some(stats) = storage.load_driver_stats(&driver_id)? else {
                return Err(format!(
                    "no saved stats for '{driver_id}'; run `f1_stats stats` first"
                )
                .into());
            };
            render::driver_stats(&stats);
        }
    }

    Ok(())
}
