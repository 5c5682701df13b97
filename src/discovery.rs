//! Enumeration of airports and dates in a FUSER data directory.
//!
//! Each airport is a sub-directory named by its code, holding one
//! scheduled-arrivals file per day named
//! `{AIRPORT}_{YYYY-MM-DD}.TBFM_data_set.csv` (a `-` separator is accepted
//! too). Arrivals files whose names do not parse are rejected with a
//! reason instead of being dropped silently.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, FilenameError};
use crate::predictor::Airport;

pub const ARRIVALS_SUFFIX: &str = ".TBFM_data_set.csv";

/// One day of scheduled arrivals for an airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// All days found for an airport, sorted by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirportDays {
    pub airport: Airport,
    pub days: Vec<DayFile>,
}

/// A data file or airport directory that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    pub airports: Vec<AirportDays>,
    pub rejected: Vec<RejectedFile>,
}

impl Inventory {
    /// Keeps only the listed airports. An empty filter keeps everything.
    pub fn retain_airports(&mut self, keep: &[Airport]) {
        if !keep.is_empty() {
            self.airports.retain(|a| keep.contains(&a.airport));
        }
    }
}

/// Canonical file name for an airport-day.
pub fn arrivals_file_name(airport: &Airport, date: NaiveDate) -> String {
    format!("{}_{}{}", airport, date.format("%Y-%m-%d"), ARRIVALS_SUFFIX)
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, FilenameError> {
    let shape_ok = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(FilenameError::MissingDate);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FilenameError::InvalidDate(s.to_string()))
}

/// Extracts the date from an arrivals file name belonging to `airport`.
pub fn parse_arrivals_filename(airport: &Airport, file_name: &str) -> Result<NaiveDate, FilenameError> {
    let stem = file_name
        .strip_suffix(ARRIVALS_SUFFIX)
        .ok_or(FilenameError::NotArrivalsFile)?;

    if stem.len() < 10 || !stem.is_char_boundary(stem.len() - 10) {
        return Err(FilenameError::MissingDate);
    }
    let (prefix, date_part) = stem.split_at(stem.len() - 10);
    let date = parse_date(date_part)?;

    let found = prefix
        .strip_suffix('_')
        .or_else(|| prefix.strip_suffix('-'))
        .unwrap_or(prefix);
    if found != airport.as_str() || found.len() == prefix.len() {
        return Err(FilenameError::AirportMismatch {
            expected: airport.to_string(),
            found: found.to_string(),
        });
    }

    Ok(date)
}

/// Lists airports (sorted by code) and their days (sorted by date).
///
/// Airport directories without any valid day are left out.
///
/// # Errors
///
/// Fails if `base_dir` is missing or a directory cannot be listed.
#[tracing::instrument(skip(base_dir), fields(base_dir = %base_dir.display()))]
pub fn discover(base_dir: &Path) -> Result<Inventory, DiscoveryError> {
    if !base_dir.is_dir() {
        return Err(DiscoveryError::DataDirMissing(base_dir.to_path_buf()));
    }

    let mut inventory = Inventory::default();

    for airport_dir in sorted_entries(base_dir)? {
        if !airport_dir.is_dir() {
            continue;
        }
        let Some(code) = airport_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let airport = match Airport::new(code) {
            Ok(airport) => airport,
            Err(e) => {
                warn!(dir = %airport_dir.display(), error = %e, "Skipping directory");
                inventory.rejected.push(RejectedFile {
                    path: airport_dir.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let mut days: BTreeMap<NaiveDate, PathBuf> = BTreeMap::new();
        for path in sorted_entries(&airport_dir)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !name.ends_with(ARRIVALS_SUFFIX) {
                debug!(file = name, "Ignoring non-arrivals file");
                continue;
            }

            let parsed = parse_arrivals_filename(&airport, name).and_then(|date| {
                if days.contains_key(&date) {
                    Err(FilenameError::DuplicateDate(date))
                } else {
                    Ok(date)
                }
            });

            match parsed {
                Ok(date) => {
                    days.insert(date, path);
                }
                Err(e) => {
                    warn!(file = name, error = %e, "Rejected arrivals file");
                    inventory.rejected.push(RejectedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if days.is_empty() {
            info!(%airport, "No arrivals files for airport");
            continue;
        }

        inventory.airports.push(AirportDays {
            airport,
            days: days
                .into_iter()
                .map(|(date, path)| DayFile { date, path })
                .collect(),
        });
    }

    Ok(inventory)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let io_err = |source: std::io::Error| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        paths.push(entry.map_err(io_err)?.path());
    }
    paths.sort();
    Ok(paths)
}
