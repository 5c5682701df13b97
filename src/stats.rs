use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::discovery::RejectedFile;
use crate::predictor::Airport;
use crate::settings::Mode;

/// Outcome of processing one airport.
#[derive(Debug, Clone, Serialize)]
pub struct AirportSummary {
    pub airport: Airport,
    pub days: usize,
    pub records: usize,

    // days that produced all-zero output
    pub zero_fallback_days: usize,
    pub load_failures: usize,

    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl AirportSummary {
    pub fn new(airport: Airport) -> Self {
        Self {
            airport,
            days: 0,
            records: 0,
            zero_fallback_days: 0,
            load_failures: 0,
            output_path: None,
            error: None,
        }
    }

    /// Record a persistence or processing failure for this airport.
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub mode: Mode,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub airports: Vec<AirportSummary>,
    pub rejected_files: Vec<RejectedFile>,
}

impl RunSummary {
    pub fn total_records(&self) -> usize {
        self.airports.iter().map(|a| a.records).sum()
    }

    pub fn failed_airports(&self) -> usize {
        self.airports.iter().filter(|a| a.error.is_some()).count()
    }
}
