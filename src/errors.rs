// Error types for poptrend

use snafu::Snafu;
use std::io;

/// Errors for the whole application. The display strings of the fetch
/// variants double as the messages shown in the error banner, so the
/// wording here is the single source of truth.
#[derive(Debug, Snafu)]
pub enum PoptrendError {
    // Errors for the IPC API client
    #[snafu(display(
        "The API returned 404, likely there is no data for {start_year}-{end_year}. Please try with any other range."
    ))]
    NoDataForRange { start_year: u16, end_year: u16 },
    #[snafu(display(
        "Error fetching data for {start_year}-{end_year}. Please try again later. Error: {source}"
    ))]
    FetchFailed {
        start_year: u16,
        end_year: u16,
        source: reqwest::Error,
    },
    #[snafu(display(
        "Error fetching data for {start_year}-{end_year}. Please try again later. Error: empty response body"
    ))]
    EmptyResponse { start_year: u16, end_year: u16 },
    #[snafu(display(
        "Error fetching data for {start_year}-{end_year}. Please try again later. Error: {source}"
    ))]
    MalformedResponse {
        start_year: u16,
        end_year: u16,
        source: serde_json::Error,
    },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
    #[snafu(display(
        "No IPC API key configured. Pass --key, set the IPC_API_KEY environment variable, or add \"api_key\" to the config file."
    ))]
    MissingApiKey,
}
