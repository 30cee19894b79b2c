use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use log::debug;

use crate::errors::PoptrendError;

use super::PopulationRecord;

pub const DEFAULT_API_URL: &str = "https://api.ipcinfo.org";

/// A trait for retrieving population classification records for a year
/// range.
///
/// This abstracts the record source so the fetch worker can run against the
/// live IPC API or against mock data in tests and offline development. One
/// call maps to one logical fetch; implementations do not retry.
pub trait PopulationSource {
    /// Retrieve all records for the inclusive year range.
    ///
    /// # Errors
    ///
    /// Returns `NoDataForRange` when the API has no analyses for the range
    /// (HTTP 404), and a fetch error for transport failures, other non-2xx
    /// statuses, or a body that is empty or not a record array.
    fn fetch(
        &mut self,
        start_year: u16,
        end_year: u16,
    ) -> Result<Vec<PopulationRecord>, PoptrendError>;
}

/// Live client for the IPC population API.
pub struct IpcApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    country: String,
    api_key: String,
}

impl IpcApiClient {
    pub fn new(country: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, country, api_key)
    }

    /// Point the client at a different endpoint, e.g. a local stub server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        country: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            country: country.into(),
            api_key: api_key.into(),
        }
    }
}

impl PopulationSource for IpcApiClient {
    fn fetch(
        &mut self,
        start_year: u16,
        end_year: u16,
    ) -> Result<Vec<PopulationRecord>, PoptrendError> {
        let url = format!(
            "{}/population?country={}&start={}&end={}&key={}",
            self.base_url, self.country, start_year, end_year, self.api_key
        );
        debug!(
            "Requesting population records for {} {}-{}",
            self.country, start_year, end_year
        );

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| PoptrendError::FetchFailed {
                start_year,
                end_year,
                source: e,
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PoptrendError::NoDataForRange {
                start_year,
                end_year,
            });
        }

        let response = response
            .error_for_status()
            .map_err(|e| PoptrendError::FetchFailed {
                start_year,
                end_year,
                source: e,
            })?;
        let body = response.text().map_err(|e| PoptrendError::FetchFailed {
            start_year,
            end_year,
            source: e,
        })?;

        decode_records(&body, start_year, end_year)
    }
}

/// Decodes an API response body into records. An empty body and a body that
/// is not a JSON array of records are reported as distinct errors so the
/// banner message can carry the parser detail when there is one.
pub fn decode_records(
    body: &str,
    start_year: u16,
    end_year: u16,
) -> Result<Vec<PopulationRecord>, PoptrendError> {
    if body.trim().is_empty() {
        return Err(PoptrendError::EmptyResponse {
            start_year,
            end_year,
        });
    }

    serde_json::from_str(body).map_err(|e| PoptrendError::MalformedResponse {
        start_year,
        end_year,
        source: e,
    })
}

/// A mock population source for testing without network access.
///
/// Replays a fixed record set (or a 404) on every fetch and counts how many
/// fetches were issued, which is what the debounce tests assert on.
pub struct MockPopulationSource {
    records: Vec<PopulationRecord>,
    not_found: bool,
    fetch_count: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockPopulationSource {
    pub fn with_records(records: Vec<PopulationRecord>) -> Self {
        Self {
            records,
            not_found: false,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose every fetch reports that the range has no data.
    pub fn not_found() -> Self {
        Self {
            records: Vec::new(),
            not_found: true,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the fetch counter, usable after the source moved into the
    /// worker thread.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetch_count)
    }
}

impl PopulationSource for MockPopulationSource {
    fn fetch(
        &mut self,
        start_year: u16,
        end_year: u16,
    ) -> Result<Vec<PopulationRecord>, PoptrendError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.not_found {
            return Err(PoptrendError::NoDataForRange {
                start_year,
                end_year,
            });
        }
        Ok(self.records.clone())
    }
}
