//! Season roster.

use f1_stats_api_models::Driver;

use super::SINGLE_PAGE_LIMIT;
use crate::{ApiError, ErgastApi};

/// Fetches the drivers registered for `season`, in API order.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails.
pub async fn current_drivers(
    api: &(impl ErgastApi + ?Sized),
    season: i32,
) -> Result<Vec<Driver>, ApiError> {
    let envelope = api
        .fetch_page(&format!("{season}/drivers"), SINGLE_PAGE_LIMIT, 0)
        .await?;
    Ok(envelope.into_drivers())
}
