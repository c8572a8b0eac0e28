//! Driver and constructor championship standings.

use f1_stats_api_models::{ConstructorStanding, DriverStanding};

use super::{SINGLE_PAGE_LIMIT, parse_number, parse_points};
use crate::{ApiError, ErgastApi};

/// Fetches the drivers' championship standings for `season`.
///
/// Only the first standings list is read; each driver is paired with the
/// first constructor they drove for.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or a row cannot be parsed.
pub async fn driver_standings(
    api: &(impl ErgastApi + ?Sized),
    season: i32,
) -> Result<Vec<DriverStanding>, ApiError> {
    let envelope = api
        .fetch_page(&format!("{season}/driverstandings"), SINGLE_PAGE_LIMIT, 0)
        .await?;
    let Some(list) = envelope.into_standings_lists().into_iter().next() else {
        return Ok(Vec::new());
    };

    list.driver_standings
        .into_iter()
        .map(|row| {
            let context = format!("driver standing {}", row.driver.driver_id);
            Ok::<_, ApiError>(DriverStanding {
                position: row
                    .position
                    .as_deref()
                    .map(|p| parse_number(p, &context))
                    .transpose()?,
                position_text: row.position_text.unwrap_or_default(),
                points: parse_points(&row.points, &context)?,
                wins: parse_number(&row.wins, &context)?,
                constructor: row.constructors.into_iter().next(),
                driver: row.driver,
            })
        })
        .collect()
}

/// Fetches the constructors' championship standings for `season`.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails or a row cannot be parsed.
pub async fn constructor_standings(
    api: &(impl ErgastApi + ?Sized),
    season: i32,
) -> Result<Vec<ConstructorStanding>, ApiError> {
    let envelope = api
        .fetch_page(
            &format!("{season}/constructorstandings"),
            SINGLE_PAGE_LIMIT,
            0,
        )
        .await?;
    let Some(list) = envelope.into_standings_lists().into_iter().next() else {
        return Ok(Vec::new());
    };

    list.constructor_standings
        .into_iter()
        .map(|row| {
            let context = format!("constructor standing {}", row.constructor.constructor_id);
            Ok::<_, ApiError>(ConstructorStanding {
                position: row
                    .position
                    .as_deref()
                    .map(|p| parse_number(p, &context))
                    .transpose()?,
                position_text: row.position_text.unwrap_or_default(),
                points: parse_points(&row.points, &context)?,
                wins: parse_number(&row.wins, &context)?,
                constructor: row.constructor,
            })
        })
        .collect()
}
