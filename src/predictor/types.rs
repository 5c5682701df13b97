//! Data types shared by the prediction pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::PredictError;

/// A validated airport code such as `KATL`.
///
/// Only ASCII letters and digits are accepted so the code can never collide
/// with the `_` separator used in prediction identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Airport(String);

impl Airport {
    pub fn new(code: &str) -> Result<Self, PredictError> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PredictError::InvalidAirport(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Airport {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// One scheduled flight, already deduplicated by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub flight_id: String,
    pub scheduled_arrival: DateTime<Utc>,
}

impl ArrivalRecord {
    pub fn new(flight_id: impl Into<String>, scheduled_arrival: DateTime<Utc>) -> Self {
        Self {
            flight_id: flight_id.into(),
            scheduled_arrival,
        }
    }
}

/// A single output row: the number of arrivals expected in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Value")]
    pub value: usize,
}
