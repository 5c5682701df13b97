//! Scheduled-arrivals CSV loader.
//!
//! Reads a `*.TBFM_data_set.csv` file, drops rows without a scheduled
//! runway arrival time, and keeps one record per flight (the latest
//! scheduled arrival).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::predictor::ArrivalRecord;

const REQUIRED_COLUMNS: [&str; 3] = ["gufi", "timestamp", "arrival_runway_sta"];

#[derive(Debug, Deserialize)]
struct ArrivalRow {
    gufi: String,
    arrival_runway_sta: Option<String>,
}

/// Loads and deduplicates the scheduled arrivals stored at `path`.
///
/// The result is sorted by arrival time, then flight id.
///
/// # Errors
///
/// Fails if the file is missing or unreadable, lacks one of the `gufi`,
/// `timestamp` and `arrival_runway_sta` columns, or holds an arrival time
/// that cannot be parsed.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_scheduled_arrivals(path: &Path) -> Result<Vec<ArrivalRecord>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?;
    let missing: Vec<_> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
    let mut total_rows = 0usize;

    for (i, result) in rdr.deserialize().enumerate() {
        let row: ArrivalRow = result.map_err(csv_err)?;
        total_rows += 1;

        let Some(raw) = row.arrival_runway_sta.as_deref().map(str::trim) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }

        let sta = parse_arrival_time(raw).ok_or_else(|| LoadError::BadTimestamp {
            path: path.to_path_buf(),
            // header is line 1
            row: i + 2,
            value: raw.to_string(),
        })?;

        latest
            .entry(row.gufi)
            .and_modify(|t| *t = (*t).max(sta))
            .or_insert(sta);
    }

    let mut arrivals: Vec<_> = latest
        .into_iter()
        .map(|(flight_id, scheduled_arrival)| ArrivalRecord {
            flight_id,
            scheduled_arrival,
        })
        .collect();
    arrivals.sort_by(|a, b| {
        a.scheduled_arrival
            .cmp(&b.scheduled_arrival)
            .then_with(|| a.flight_id.cmp(&b.flight_id))
    });

    debug!(total_rows, "Read scheduled arrival rows");
    info!(count = arrivals.len(), "Total scheduled arrivals loaded");

    Ok(arrivals)
}

/// Parses an arrival time as UTC.
///
/// Accepts RFC 3339, and `YYYY-MM-DD HH:MM:SS[.fff]` (space or `T`
/// separated) with or without a trailing offset. Times without an offset
/// are taken as UTC.
pub fn parse_arrival_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ] {
        if let Ok(t) = DateTime::parse_from_str(s, fmt) {
            return Some(t.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_arrival_time_formats() {
        let expected = Utc.with_ymd_and_hms(2022, 9, 1, 5, 10, 0).unwrap();

        assert_eq!(parse_arrival_time("2022-09-01 05:10:00"), Some(expected));
        assert_eq!(parse_arrival_time("2022-09-01T05:10:00"), Some(expected));
        assert_eq!(parse_arrival_time("2022-09-01T05:10:00Z"), Some(expected));
        assert_eq!(parse_arrival_time("2022-09-01 05:10:00+00:00"), Some(expected));
        assert_eq!(parse_arrival_time("2022-09-01T07:10:00+02:00"), Some(expected));
        assert_eq!(
            parse_arrival_time("2022-09-01 05:10:00.250"),
            Some(expected + TimeDelta::milliseconds(250))
        );
        assert_eq!(parse_arrival_time("yesterday"), None);
    }

    #[test]
    fn test_load_keeps_latest_per_flight() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "KATL_2022-09-01.TBFM_data_set.csv",
            "gufi,timestamp,arrival_runway_sta\n\
             A,2022-09-01 00:00:00,2022-09-01 05:40:00\n\
             A,2022-09-01 01:00:00,2022-09-01 05:10:00\n\
             B,2022-09-01 00:00:00,2022-09-01 06:00:00\n\
             C,2022-09-01 00:00:00,\n",
        );

        let arrivals = load_scheduled_arrivals(&path).unwrap();

        assert_eq!(arrivals.len(), 2);
        assert_eq!(arrivals[0].flight_id, "A");
        assert_eq!(
            arrivals[0].scheduled_arrival,
            Utc.with_ymd_and_hms(2022, 9, 1, 5, 40, 0).unwrap()
        );
        assert_eq!(arrivals[1].flight_id, "B");
    }

    #[test]
    fn test_load_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "arrivals.csv",
            "timestamp,gufi,arrival_stand_sta,arrival_runway_sta\n\
             2022-09-01 00:00:00,A,2022-09-01 05:50:00,2022-09-01 05:45:00\n",
        );

        let arrivals = load_scheduled_arrivals(&path).unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(
            arrivals[0].scheduled_arrival,
            Utc.with_ymd_and_hms(2022, 9, 1, 5, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_load_header_with_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "padded.csv",
            "gufi, timestamp, arrival_runway_sta\n\
             A,2022-09-01 00:00:00,2022-09-01 05:10:00\n",
        );

        let arrivals = load_scheduled_arrivals(&path).unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(
            arrivals[0].scheduled_arrival,
            Utc.with_ymd_and_hms(2022, 9, 1, 5, 10, 0).unwrap()
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_scheduled_arrivals(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_load_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "bad.csv", "gufi,arrival_runway_sta\nA,2022-09-01 05:00:00\n");

        match load_scheduled_arrivals(&path) {
            Err(LoadError::MissingColumns { missing, .. }) => assert_eq!(missing, vec!["timestamp"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_bad_timestamp_reports_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "bad.csv",
            "gufi,timestamp,arrival_runway_sta\n\
             A,2022-09-01 00:00:00,2022-09-01 05:00:00\n\
             B,2022-09-01 00:00:00,not-a-time\n",
        );

        match load_scheduled_arrivals(&path) {
            Err(LoadError::BadTimestamp { row, value, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "not-a-time");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_header_only_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "empty.csv", "gufi,timestamp,arrival_runway_sta\n");
        assert!(load_scheduled_arrivals(&path).unwrap().is_empty());
    }
}
