//! Offset pagination over race listings.
//!
//! Per-driver listings (`drivers/{id}/results`, `drivers/{id}/qualifying`)
//! span a whole career and are paged with `limit`/`offset`. Pages are
//! fetched strictly in order with a fixed pause in between to stay under
//! the upstream rate limit.

use std::time::Duration;

use f1_stats_api_models::wire::Race;

use crate::{ApiError, ErgastApi};

/// Records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pause between two page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(200);

/// Paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Records requested per page.
    pub page_size: u32,
    /// Pause between pages.
    pub delay: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Fetches every race in `resource_path`, concatenated in page order.
///
/// Stops when a page comes back empty or the offset reaches the total the
/// API reports.
///
/// # Errors
///
/// Returns the first [`ApiError`] encountered. Races from earlier pages are
/// discarded in that case.
pub async fn fetch_all_races(
    api: &(impl ErgastApi + ?Sized),
    resource_path: &str,
    options: PageOptions,
) -> Result<Vec<Race>, ApiError> {
    let page_size = options.page_size.max(1);
    let mut races = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let envelope = api.fetch_page(resource_path, page_size, offset).await?;
        let total = envelope.total();
        let page = envelope.into_races();

        if page.is_empty() {
            break;
        }

        log::debug!(
            "{resource_path}: {} races at offset {offset} (total: {total})",
            page.len()
        );
        races.extend(page);

        offset += u64::from(page_size);
        if offset >= total {
            break;
        }

        tokio::time::sleep(options.delay).await;
    }

    Ok(races)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use f1_stats_api_models::Envelope;

    use super::*;

    /// In-memory API returning fixed JSON bodies keyed by resource path.
    /// Paged resources are sliced by `limit`/`offset`.
    pub struct FakeApi {
        pub races: BTreeMap<String, Vec<serde_json::Value>>,
        pub requests: Mutex<Vec<(String, u32, u64)>>,
    }

    impl FakeApi {
        pub fn with_races(path: &str, races: Vec<serde_json::Value>) -> Self {
            let mut map = BTreeMap::new();
            map.insert(path.to_owned(), races);
            Self {
                races: map,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ErgastApi for FakeApi {
        async fn fetch_page(
            &self,
            resource_path: &str,
            limit: u32,
            offset: u64,
        ) -> Result<Envelope, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push((resource_path.to_owned(), limit, offset));
            let all = self.races.get(resource_path).cloned().unwrap_or_default();
            let page: Vec<_> = all
                .iter()
                .skip(usize::try_from(offset).unwrap())
                .take(limit as usize)
                .cloned()
                .collect();
            Ok(serde_json::from_value(serde_json::json!({
                "MRData": {
                    "total": all.len().to_string(),
                    "RaceTable": { "Races": page }
                }
            }))
            .unwrap())
        }
    }

    pub fn race(season: u32, round: u32) -> serde_json::Value {
        serde_json::json!({
            "season": season.to_string(),
            "round": round.to_string(),
            "raceName": format!("Race {season}-{round}"),
            "date": format!("{season}-06-01"),
            "Results": [{ "position": "5", "points": "10" }]
        })
    }

    fn no_delay() -> PageOptions {
        PageOptions {
            page_size: 100,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn fetches_three_pages_for_250_results() {
        let all: Vec<_> = (1..=250).map(|i| race(2000 + i / 25, i % 25)).collect();
        let api = FakeApi::with_races("drivers/alonso/results", all);

        let races = fetch_all_races(&api, "drivers/alonso/results", no_delay())
            .await
            .unwrap();

        assert_eq!(races.len(), 250);
        let requests = api.requests.lock().unwrap();
        let offsets: Vec<u64> = requests.iter().map(|(_, _, offset)| *offset).collect();
        assert_eq!(offsets, vec![0, 100, 200]);
        assert!(requests.iter().all(|(_, limit, _)| *limit == 100));

        // Page order is preserved.
        assert_eq!(races[0].race_name, "Race 2000-1");
        assert_eq!(races[249].race_name, "Race 2010-0");
    }

    #[tokio::test]
    async fn stops_on_empty_first_page() {
        let api = FakeApi::with_races("drivers/rookie/results", Vec::new());
        let races = fetch_all_races(&api, "drivers/rookie/results", no_delay())
            .await
            .unwrap();
        assert!(races.is_empty());
        assert_eq!(api.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exact_multiple_of_page_size_needs_no_extra_request() {
        let all: Vec<_> = (1..=200).map(|i| race(2020, i)).collect();
        let api = FakeApi::with_races("drivers/x/results", all);
        let races = fetch_all_races(&api, "drivers/x/results", no_delay())
            .await
            .unwrap();
        assert_eq!(races.len(), 200);
        assert_eq!(api.requests.lock().unwrap().len(), 2);
    }
}
