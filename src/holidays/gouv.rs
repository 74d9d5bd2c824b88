//! French government public holiday calendar client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::HolidayTable;

use super::HolidaySource;

/// Base URL of the metropolitan France holiday calendar.
pub const DEFAULT_HOLIDAYS_URL: &str = "https://calendrier.api.gouv.fr/jours-feries/metropole";

/// Fetches `{base_url}/{year}.json` from the government calendar API.
#[derive(Debug, Clone)]
pub struct GouvHolidaySource {
    client: reqwest::Client,
    base_url: String,
}

impl GouvHolidaySource {
    /// Creates a client with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::HolidayFetch {
                year: 0,
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, year: i32) -> String {
        format!("{}/{}.json", self.base_url, year)
    }
}

#[async_trait]
impl HolidaySource for GouvHolidaySource {
    async fn fetch(&self, year: i32) -> EngineResult<HolidayTable> {
        let url = self.url_for(year);
        debug!(%url, year, "Fetching public holidays");

        let fetch_error = |e: reqwest::Error| EngineError::HolidayFetch {
            year,
            message: e.to_string(),
        };

        self.client
            .get(&url)
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?
            .json::<HolidayTable>()
            .await
            .map_err(fetch_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_year_trims_trailing_slash() {
        let source = GouvHolidaySource::new(
            "https://calendrier.api.gouv.fr/jours-feries/metropole/",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            source.url_for(2026),
            "https://calendrier.api.gouv.fr/jours-feries/metropole/2026.json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_holiday_fetch_error() {
        let source = GouvHolidaySource::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        match source.fetch(2026).await {
            Err(EngineError::HolidayFetch { year, .. }) => assert_eq!(year, 2026),
            other => panic!("Expected HolidayFetch error, got {:?}", other),
        }
    }
}
