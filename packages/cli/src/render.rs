//! Plain-text tables for terminal output.

use std::collections::BTreeMap;

use f1_stats_aggregate_models::DriverStats;
use f1_stats_api_models::{
    ConstructorStanding, Driver, DriverStanding, LastRaceResults, RaceScheduleEntry, RaceWinner,
};

pub fn schedule(races: &[RaceScheduleEntry]) {
    println!("{:<5} {:<19} {:<28} CIRCUIT", "ROUND", "START (UTC)", "RACE");
    println!("{}", "-".repeat(90));
    for race in races {
        println!(
            "{:<5} {:<19} {:<28} {}",
            race.round,
            race.starts_at().format("%Y-%m-%d %H:%M"),
            race.race_name,
            location(race)
        );
    }
}

fn location(race: &RaceScheduleEntry) -> String {
    match (&race.circuit_name, &race.country) {
        (Some(circuit), Some(country)) => format!("{circuit} ({country})"),
        (Some(circuit), None) => circuit.clone(),
        (None, Some(country)) => country.clone(),
        (None, None) => String::new(),
    }
}

pub fn driver_standings(standings: &[DriverStanding]) {
    println!(
        "{:<4} {:<26} {:<20} {:>7} {:>5}",
        "POS", "DRIVER", "CONSTRUCTOR", "POINTS", "WINS"
    );
    println!("{}", "-".repeat(66));
    for row in standings {
        println!(
            "{:<4} {:<26} {:<20} {:>7} {:>5}",
            row.position_text,
            row.driver.full_name(),
            row.constructor.as_ref().map_or("", |c| c.name.as_str()),
            row.points,
            row.wins
        );
    }
}

pub fn constructor_standings(standings: &[ConstructorStanding]) {
    println!("{:<4} {:<26} {:>7} {:>5}", "POS", "CONSTRUCTOR", "POINTS", "WINS");
    println!("{}", "-".repeat(45));
    for row in standings {
        println!(
            "{:<4} {:<26} {:>7} {:>5}",
            row.position_text, row.constructor.name, row.points, row.wins
        );
    }
}

pub fn last_results(last: &LastRaceResults) {
    println!("{} ({})", last.race_name, last.date);
    if let Some(circuit) = &last.circuit {
        match &last.country {
            Some(country) => println!("{circuit}, {country}"),
            None => println!("{circuit}"),
        }
    }
    println!();
    println!(
        "{:<4} {:<4} {:<26} {:<20} {:>6} {:<14} FASTEST LAP",
        "POS", "CODE", "DRIVER", "CONSTRUCTOR", "POINTS", "TIME/STATUS"
    );
    println!("{}", "-".repeat(95));
    for row in &last.results {
        println!(
            "{:<4} {:<4} {:<26} {:<20} {:>6} {:<14} {}",
            row.position.to_string(),
            row.driver_code,
            row.driver_name,
            row.constructor,
            row.points,
            row.time.as_deref().unwrap_or(&row.status),
            row.fastest_lap_time.as_deref().unwrap_or("-")
        );
    }
}

pub fn winners(winners: &BTreeMap<u32, RaceWinner>) {
    println!("{:<5} {:<4} {:<26} CONSTRUCTOR", "ROUND", "CODE", "DRIVER");
    println!("{}", "-".repeat(58));
    for (round, winner) in winners {
        println!(
            "{round:<5} {:<4} {:<26} {}",
            winner.driver_code, winner.driver_name, winner.constructor
        );
    }
}

pub fn drivers(drivers: &[Driver]) {
    println!(
        "{:<20} {:>3} {:<4} {:<26} NATIONALITY",
        "ID", "NO", "CODE", "NAME"
    );
    println!("{}", "-".repeat(70));
    for driver in drivers {
        println!(
            "{:<20} {:>3} {:<4} {:<26} {}",
            driver.driver_id,
            driver.permanent_number,
            driver.code,
            driver.full_name(),
            driver.nationality
        );
    }
}

pub fn stats_table(stats: &[DriverStats]) {
    println!(
        "{:<26} {:>8} {:>5} {:>7} {:>5} {:>4} {:>7}",
        "DRIVER", "POINTS", "WINS", "PODIUMS", "POLES", "FL", "SEASONS"
    );
    println!("{}", "-".repeat(70));
    for row in stats {
        println!(
            "{:<26} {:>8} {:>5} {:>7} {:>5} {:>4} {:>7}",
            row.driver.full_name(),
            row.total_points,
            row.total_wins,
            row.total_podiums,
            row.total_poles,
            row.fastest_laps,
            row.seasons_raced
        );
    }
}

pub fn driver_stats(stats: &DriverStats) {
    let driver = &stats.driver;
    println!("{} ({})", driver.full_name(), driver.driver_id);
    if !driver.code.is_empty() || !driver.permanent_number.is_empty() {
        println!("  #{} {}", driver.permanent_number, driver.code);
    }
    println!("  Nationality:   {}", driver.nationality);
    println!("  Born:          {}", driver.date_of_birth);
    println!("  Points:        {}", stats.total_points);
    println!("  Wins:          {}", stats.total_wins);
    println!("  Podiums:       {}", stats.total_podiums);
    println!("  Poles:         {}", stats.total_poles);
    println!("  Fastest laps:  {}", stats.fastest_laps);
    println!("  Seasons:       {}", stats.seasons_raced);
}
