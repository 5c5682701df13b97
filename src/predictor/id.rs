use chrono::{DateTime, Utc};

use super::types::Airport;

/// Builds `{airport}_{YYMMDD}_{HHMM}_{upper:03}` from a UTC issue time.
pub fn prediction_id(airport: &Airport, issue_time: DateTime<Utc>, upper_minutes: u32) -> String {
    format!(
        "{}_{}_{:03}",
        airport,
        issue_time.format("%y%m%d_%H%M"),
        upper_minutes
    )
}
