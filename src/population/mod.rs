pub mod client;
pub mod fetcher;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::PoptrendError;

/// One IPC analysis entry for the selected country: the population assigned
/// to each classification phase on a given reporting date.
///
/// The API does not guarantee chronological order, and older analyses may
/// omit the percentage field entirely.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PopulationRecord {
    /// Reporting date as returned by the API, e.g. "2021-03-01" or "2021-03"
    pub analysis_date: String,
    #[serde(default)]
    pub phase1_population: u64,
    #[serde(default)]
    pub phase2_population: u64,
    #[serde(default)]
    pub phase3_population: u64,
    #[serde(default)]
    pub phase4_population: u64,
    #[serde(default)]
    pub phase5_population: u64,
    /// Fraction of the country population covered by the analysis, in [0, 1]
    #[serde(default)]
    pub population_percentage: Option<f64>,
}

impl PopulationRecord {
    /// Population assigned to the given phase (1-5). Phases outside that
    /// range do not exist in the IPC scale and report zero.
    pub fn phase_population(&self, phase: usize) -> u64 {
        match phase {
            1 => self.phase1_population,
            2 => self.phase2_population,
            3 => self.phase3_population,
            4 => self.phase4_population,
            5 => self.phase5_population,
            _ => 0,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_analysis_date(&self.analysis_date)
    }
}

/// Parses an `analysis_date` value. The API mixes full dates with
/// month-level and year-level entries, so `YYYY-MM-DD`, `YYYY-MM` and bare
/// `YYYY` are all accepted; missing components default to the start of the
/// period.
pub fn parse_analysis_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(year) = raw.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    None
}

/// Sorts records ascending by parsed `analysis_date`. Records whose date
/// does not parse sink to the end, keeping their relative order.
pub fn sort_records(records: &mut [PopulationRecord]) {
    records.sort_by_key(|record| match record.parsed_date() {
        Some(date) => (false, date),
        None => (true, NaiveDate::MIN),
    });
}

/// Range selected with the year sliders, handed to the fetch worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub start_year: u16,
    pub end_year: u16,
}

/// Result of one settled fetch, sent back to the UI thread.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded {
        request: FetchRequest,
        records: Vec<PopulationRecord>,
    },
    Failed {
        request: FetchRequest,
        error: PoptrendError,
    },
}
