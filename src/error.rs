//! Error types for discovery, loading and prediction.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Caller contract violations in the prediction core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    /// Airport code is empty or contains characters other than ASCII letters and digits.
    #[error("invalid airport code '{0}'")]
    InvalidAirport(String),

    /// Issue grid or bucket ladder parameters are out of range.
    #[error("invalid prediction config: {0}")]
    InvalidConfig(String),
}

/// Failure to read a scheduled-arrivals file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("scheduled arrivals file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing required columns in {path}: {missing:?}")]
    MissingColumns {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("unparseable arrival time '{value}' at row {row} of {path}")]
    BadTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },
}

/// Failure to enumerate airports and dates. Fatal for a run.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("data directory not found: {0}")]
    DataDirMissing(PathBuf),

    #[error("failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reason a data file name was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("not a scheduled arrivals file")]
    NotArrivalsFile,

    #[error("no YYYY-MM-DD date in file name")]
    MissingDate,

    #[error("'{0}' is not a valid calendar date")]
    InvalidDate(String),

    #[error("file name prefix '{found}' does not match airport '{expected}'")]
    AirportMismatch { expected: String, found: String },

    #[error("another file already provides {0}")]
    DuplicateDate(NaiveDate),
}
